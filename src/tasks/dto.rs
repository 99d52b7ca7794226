use serde::Deserialize;
use time::OffsetDateTime;
use url::Url;

use crate::error::FieldError;
use crate::tasks::repo::{
    AssessmentPoint, AssignedAssignment, FileSubmission, NewTask, StudentInfo, Task, TaskStatus,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub video_title: String,
    #[serde(default)]
    pub video_duration: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub students_involved: i32,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub assessment_points: Vec<AssessmentPoint>,
    #[serde(default)]
    pub assigned_assignments: Vec<AssignedAssignment>,
    #[serde(default)]
    pub student_info: StudentInfo,
    #[serde(default)]
    pub file_submission: FileSubmission,
    #[serde(default)]
    pub status: TaskStatus,
}

impl CreateTaskRequest {
    /// Check the required descriptive fields, reporting every violation.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        required(&mut errors, "title", &self.title, "Title is required");
        required(
            &mut errors,
            "description",
            &self.description,
            "Description is required",
        );
        if Url::parse(self.video_url.trim()).is_err() {
            errors.push(FieldError::new("videoUrl", "Valid video URL is required"));
        }
        required(
            &mut errors,
            "videoTitle",
            &self.video_title,
            "Video title is required",
        );
        required(&mut errors, "category", &self.category, "Category is required");
        required(
            &mut errors,
            "subcategory",
            &self.subcategory,
            "Subcategory is required",
        );
        required(&mut errors, "duration", &self.duration, "Duration is required");

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn into_new_task(self) -> NewTask {
        let mut file_submission = self.file_submission;
        if file_submission.last_modified.is_none() {
            file_submission.last_modified = Some(OffsetDateTime::now_utc());
        }
        NewTask {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            video_url: self.video_url.trim().to_string(),
            video_title: self.video_title.trim().to_string(),
            video_duration: self.video_duration,
            category: self.category.trim().to_string(),
            subcategory: self.subcategory.trim().to_string(),
            students_involved: self.students_involved,
            duration: self.duration.trim().to_string(),
            assessment_points: self.assessment_points,
            assigned_assignments: self.assigned_assignments,
            student_info: self.student_info,
            file_submission,
            status: self.status,
        }
    }
}

fn required(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

/// Partial task update: only supplied fields change. `createdBy` is absent
/// on purpose; it is immutable after creation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub video_title: Option<String>,
    pub video_duration: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub students_involved: Option<i32>,
    pub duration: Option<String>,
    pub assessment_points: Option<Vec<AssessmentPoint>>,
    pub assigned_assignments: Option<Vec<AssignedAssignment>>,
    pub student_info: Option<StudentInfo>,
    pub file_submission: Option<FileSubmission>,
    pub status: Option<TaskStatus>,
}

impl UpdateTaskRequest {
    pub fn apply(self, task: &mut Task) {
        if let Some(v) = self.title {
            task.title = v;
        }
        if let Some(v) = self.description {
            task.description = v;
        }
        if let Some(v) = self.video_url {
            task.video_url = v;
        }
        if let Some(v) = self.video_title {
            task.video_title = v;
        }
        if let Some(v) = self.video_duration {
            task.video_duration = v;
        }
        if let Some(v) = self.category {
            task.category = v;
        }
        if let Some(v) = self.subcategory {
            task.subcategory = v;
        }
        if let Some(v) = self.students_involved {
            task.students_involved = v;
        }
        if let Some(v) = self.duration {
            task.duration = v;
        }
        if let Some(v) = self.assessment_points {
            task.assessment_points.0 = v;
        }
        if let Some(v) = self.assigned_assignments {
            task.assigned_assignments.0 = v;
        }
        if let Some(v) = self.student_info {
            task.student_info.0 = v;
        }
        if let Some(v) = self.file_submission {
            task.file_submission.0 = v;
        }
        if let Some(v) = self.status {
            task.status = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn valid_create() -> CreateTaskRequest {
        serde_json::from_value(json!({
            "title": "Creating Awesome Mobile Apps",
            "description": "Follow the video and rebuild the login flow",
            "videoUrl": "https://videos.example.com/mobile-apps.mp4",
            "videoTitle": "Mobile apps walkthrough",
            "videoDuration": "10:45",
            "category": "UI UX Design",
            "subcategory": "Apps Design",
            "duration": "1 Hour"
        }))
        .expect("deserialize")
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut req = valid_create();
        req.title = "   ".into();
        let err = req.validate().unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err[0].field, "title");
    }

    #[test]
    fn bad_url_is_rejected() {
        let mut req = valid_create();
        req.video_url = "not a url".into();
        let err = req.validate().unwrap_err();
        assert_eq!(err[0].field, "videoUrl");
    }

    #[test]
    fn violations_accumulate() {
        let req = CreateTaskRequest::default();
        let err = req.validate().unwrap_err();
        let fields: Vec<&str> = err.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "title",
                "description",
                "videoUrl",
                "videoTitle",
                "category",
                "subcategory",
                "duration"
            ]
        );
    }

    #[test]
    fn into_new_task_trims_and_stamps_submission() {
        let mut req = valid_create();
        req.title = "  Creating Awesome Mobile Apps  ".into();
        let new = req.into_new_task();
        assert_eq!(new.title, "Creating Awesome Mobile Apps");
        assert!(new.file_submission.last_modified.is_some());
        assert_eq!(new.status, TaskStatus::Pending);
    }

    fn sample_task() -> Task {
        let new = valid_create().into_new_task();
        let now = OffsetDateTime::now_utc();
        Task {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            video_url: new.video_url,
            video_title: new.video_title,
            video_duration: new.video_duration,
            category: new.category,
            subcategory: new.subcategory,
            students_involved: new.students_involved,
            duration: new.duration,
            assessment_points: Json(new.assessment_points),
            assigned_assignments: Json(new.assigned_assignments),
            student_info: Json(new.student_info),
            file_submission: Json(new.file_submission),
            status: new.status,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn update_only_touches_supplied_fields() {
        let mut task = sample_task();
        let creator = task.created_by;
        let original_description = task.description.clone();

        let patch: UpdateTaskRequest = serde_json::from_value(json!({
            "title": "Renamed",
            "status": "in_progress"
        }))
        .expect("deserialize");
        patch.apply(&mut task);

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.description, original_description);
        assert_eq!(task.created_by, creator);
    }

    #[test]
    fn update_replaces_assessment_points_wholesale() {
        let mut task = sample_task();
        let patch: UpdateTaskRequest = serde_json::from_value(json!({
            "assessmentPoints": [
                { "point": "Understanding the tools", "completed": true },
                { "point": "Understand the basics of making designs" }
            ]
        }))
        .expect("deserialize");
        patch.apply(&mut task);

        assert_eq!(task.assessment_points.0.len(), 2);
        assert!(task.assessment_points.0[0].completed);
        assert!(!task.assessment_points.0[1].completed);
    }

    #[test]
    fn status_uses_snake_case_on_the_wire() {
        let task = sample_task();
        let v = serde_json::to_value(&task).expect("serialize");
        assert_eq!(v["status"], "pending");
        assert!(v.get("createdBy").is_some());
        assert!(v["videoUrl"].is_string());
    }
}
