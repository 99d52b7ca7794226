use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::extract::CurrentUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::tasks::dto::{CreateTaskRequest, UpdateTaskRequest};
use crate::tasks::repo::{self, Task};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

/// Only the creator may mutate a task. Checked on every request, against the
/// row as currently stored.
fn ensure_creator(task: &Task, user_id: Uuid) -> Result<(), ApiError> {
    if task.created_by != user_id {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[instrument(skip(state, _user))]
async fn list_tasks(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = repo::list_all(&state.db).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, _user))]
async fn get_task(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task not found"))?;
    Ok(Json(task))
}

#[instrument(skip(state, user, body))]
async fn create_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    body.validate().map_err(ApiError::Validation)?;

    let task = repo::create(&state.db, user.id, body.into_new_task()).await?;
    info!(task_id = %task.id, user_id = %user.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, user, body))]
async fn update_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let mut task = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task not found"))?;
    ensure_creator(&task, user.id)?;

    body.apply(&mut task);
    let task = repo::update(&state.db, &task).await?;
    Ok(Json(task))
}

#[instrument(skip(state, user))]
async fn delete_task(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let task = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task not found"))?;
    ensure_creator(&task, user.id)?;

    repo::delete(&state.db, id).await?;
    info!(task_id = %id, user_id = %user.id, "task deleted");
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::repo::{FileSubmission, StudentInfo, TaskStatus};
    use sqlx::types::Json;
    use time::OffsetDateTime;

    fn task_owned_by(user_id: Uuid) -> Task {
        let now = OffsetDateTime::now_utc();
        Task {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: "d".into(),
            video_url: "https://example.com/v.mp4".into(),
            video_title: "v".into(),
            video_duration: "1:00".into(),
            category: "c".into(),
            subcategory: "s".into(),
            students_involved: 0,
            duration: "1 Hour".into(),
            assessment_points: Json(vec![]),
            assigned_assignments: Json(vec![]),
            student_info: Json(StudentInfo::default()),
            file_submission: Json(FileSubmission::default()),
            status: TaskStatus::Pending,
            created_by: user_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn creator_may_mutate() {
        let user = Uuid::new_v4();
        assert!(ensure_creator(&task_owned_by(user), user).is_ok());
    }

    #[test]
    fn non_creator_is_rejected() {
        let err = ensure_creator(&task_owned_by(Uuid::new_v4()), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
