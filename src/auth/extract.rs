use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts the bearer token, verifies it and resolves the user row.
///
/// Every failure mode after the missing-header case (bad scheme, forged or
/// expired token, user deleted since issuance) rejects with the same 401
/// body, so the response never reveals which check failed or whether the
/// user exists.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::MissingCredential)?;

        let token = token_from_header(header).ok_or(ApiError::MissingCredential)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::InvalidCredential
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(ApiError::InvalidCredential)?;

        Ok(CurrentUser(user))
    }
}

/// Strip the `Bearer ` prefix; an empty remainder counts as no token.
fn token_from_header(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::token_from_header;

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(token_from_header("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn raw_token_passes_through() {
        // the verifier rejects it later; header parsing stays permissive
        assert_eq!(token_from_header("abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        assert_eq!(token_from_header("Bearer "), None);
        assert_eq!(token_from_header(""), None);
    }
}
