use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::settings::dto::Settings;

/// Write the whole settings sub-record back in one statement. Partial-update
/// semantics live in `SettingsPatch::apply`; the row write itself is atomic.
pub async fn save(db: &PgPool, user_id: Uuid, settings: &Settings) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET settings = $2 WHERE id = $1")
        .bind(user_id)
        .bind(Json(settings))
        .execute(db)
        .await?;
    Ok(())
}
