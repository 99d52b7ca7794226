use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One entry of a task's assessment checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPoint {
    pub point: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedAssignment {
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedFile {
    pub filename: Option<String>,
    pub original_name: Option<String>,
    pub path: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub uploaded_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileSubmission {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified: Option<OffsetDateTime>,
    #[serde(default)]
    pub submitted_files: Vec<SubmittedFile>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A task row. `created_by` is set once at insertion and is the sole
/// authorization anchor for mutation; no query ever updates it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub video_title: String,
    pub video_duration: String,
    pub category: String,
    pub subcategory: String,
    pub students_involved: i32,
    pub duration: String,
    pub assessment_points: Json<Vec<AssessmentPoint>>,
    pub assigned_assignments: Json<Vec<AssignedAssignment>>,
    pub student_info: Json<StudentInfo>,
    pub file_submission: Json<FileSubmission>,
    pub status: TaskStatus,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const TASK_COLUMNS: &str = "id, title, description, video_url, video_title, video_duration, \
     category, subcategory, students_involved, duration, assessment_points, \
     assigned_assignments, student_info, file_submission, status, created_by, \
     created_at, updated_at";

/// All tasks, newest first. Reads are not scoped to the caller; only
/// mutation is owner-restricted.
pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Task>> {
    let rows = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(task)
}

pub struct NewTask {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub video_title: String,
    pub video_duration: String,
    pub category: String,
    pub subcategory: String,
    pub students_involved: i32,
    pub duration: String,
    pub assessment_points: Vec<AssessmentPoint>,
    pub assigned_assignments: Vec<AssignedAssignment>,
    pub student_info: StudentInfo,
    pub file_submission: FileSubmission,
    pub status: TaskStatus,
}

pub async fn create(db: &PgPool, created_by: Uuid, new: NewTask) -> anyhow::Result<Task> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, video_url, video_title, video_duration, \
         category, subcategory, students_involved, duration, assessment_points, \
         assigned_assignments, student_info, file_submission, status, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.video_url)
    .bind(&new.video_title)
    .bind(&new.video_duration)
    .bind(&new.category)
    .bind(&new.subcategory)
    .bind(new.students_involved)
    .bind(&new.duration)
    .bind(Json(&new.assessment_points))
    .bind(Json(&new.assigned_assignments))
    .bind(Json(&new.student_info))
    .bind(Json(&new.file_submission))
    .bind(new.status)
    .bind(created_by)
    .fetch_one(db)
    .await?;
    Ok(task)
}

/// Persist an in-memory task state; `created_by` and `created_at` stay as
/// inserted.
pub async fn update(db: &PgPool, task: &Task) -> anyhow::Result<Task> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks SET title = $2, description = $3, video_url = $4, video_title = $5, \
         video_duration = $6, category = $7, subcategory = $8, students_involved = $9, \
         duration = $10, assessment_points = $11, assigned_assignments = $12, \
         student_info = $13, file_submission = $14, status = $15, updated_at = now()
         WHERE id = $1
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(&task.video_url)
    .bind(&task.video_title)
    .bind(&task.video_duration)
    .bind(&task.category)
    .bind(&task.subcategory)
    .bind(task.students_involved)
    .bind(&task.duration)
    .bind(&task.assessment_points)
    .bind(&task.assigned_assignments)
    .bind(&task.student_info)
    .bind(&task.file_submission)
    .bind(task.status)
    .fetch_one(db)
    .await?;
    Ok(task)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
