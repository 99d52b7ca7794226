use axum::{extract::State, routing::get, Json, Router};
use serde_json::Value;
use tracing::instrument;

use crate::auth::extract::CurrentUser;
use crate::error::ApiError;
use crate::settings::dto::{Settings, SettingsPatch};
use crate::settings::repo;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}

#[instrument(skip(user))]
async fn get_settings(CurrentUser(user): CurrentUser) -> Json<Settings> {
    Json(user.settings.0)
}

#[instrument(skip(state, user, body))]
async fn update_settings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<Value>,
) -> Result<Json<Settings>, ApiError> {
    let patch = SettingsPatch::from_value(&body).map_err(ApiError::Validation)?;

    let mut settings = user.settings.0;
    patch.apply(&mut settings);
    repo::save(&state.db, user.id, &settings).await?;

    Ok(Json(settings))
}
