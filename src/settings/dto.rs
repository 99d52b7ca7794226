use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeFormat {
    #[serde(rename = "12 Hours")]
    TwelveHours,
    #[serde(rename = "24 Hours")]
    TwentyFourHours,
}

impl TimeFormat {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "12 Hours" => Some(TimeFormat::TwelveHours),
            "24 Hours" => Some(TimeFormat::TwentyFourHours),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notifications {
    pub message: bool,
    pub task_update: bool,
    pub task_deadline: bool,
    pub mentor_help: bool,
}

/// Per-user preferences, stored as one embedded sub-record on the user row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: String,
    pub timezone: String,
    pub time_format: TimeFormat,
    pub notifications: Notifications,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "English".into(),
            timezone: "UTC".into(),
            time_format: TimeFormat::TwelveHours,
            notifications: Notifications {
                message: true,
                task_update: true,
                task_deadline: true,
                mentor_help: true,
            },
        }
    }
}

/// A validated partial update. Only fields present in the request body are
/// populated; `apply` leaves everything else untouched.
#[derive(Debug, Default)]
pub struct SettingsPatch {
    pub language: Option<String>,
    pub timezone: Option<String>,
    pub time_format: Option<TimeFormat>,
    pub message: Option<bool>,
    pub task_update: Option<bool>,
    pub task_deadline: Option<bool>,
    pub mentor_help: Option<bool>,
}

impl SettingsPatch {
    /// Validate a raw JSON body against the settings allow-list. Every
    /// violated field is reported, not just the first. Unrecognized keys are
    /// ignored.
    pub fn from_value(body: &Value) -> Result<Self, Vec<FieldError>> {
        let mut patch = SettingsPatch::default();
        let mut errors = Vec::new();

        patch.language = take_string(body, "language", "Language must be a string", &mut errors);
        patch.timezone = take_string(body, "timezone", "Timezone must be a string", &mut errors);

        if let Some(v) = body.get("timeFormat") {
            match v.as_str().and_then(TimeFormat::parse) {
                Some(tf) => patch.time_format = Some(tf),
                None => errors.push(FieldError::new(
                    "timeFormat",
                    "Time format must be 12 Hours or 24 Hours",
                )),
            }
        }

        match body.get("notifications") {
            None => {}
            Some(n @ Value::Object(_)) => {
                patch.message = take_bool(
                    n,
                    "message",
                    "notifications.message",
                    "Message notification must be boolean",
                    &mut errors,
                );
                patch.task_update = take_bool(
                    n,
                    "taskUpdate",
                    "notifications.taskUpdate",
                    "Task update notification must be boolean",
                    &mut errors,
                );
                patch.task_deadline = take_bool(
                    n,
                    "taskDeadline",
                    "notifications.taskDeadline",
                    "Task deadline notification must be boolean",
                    &mut errors,
                );
                patch.mentor_help = take_bool(
                    n,
                    "mentorHelp",
                    "notifications.mentorHelp",
                    "Mentor help notification must be boolean",
                    &mut errors,
                );
            }
            Some(_) => errors.push(FieldError::new(
                "notifications",
                "Notifications must be an object",
            )),
        }

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(errors)
        }
    }

    /// Merge the patch into `settings`; absent fields keep their value.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.language {
            settings.language = v.clone();
        }
        if let Some(v) = &self.timezone {
            settings.timezone = v.clone();
        }
        if let Some(v) = self.time_format {
            settings.time_format = v;
        }
        if let Some(v) = self.message {
            settings.notifications.message = v;
        }
        if let Some(v) = self.task_update {
            settings.notifications.task_update = v;
        }
        if let Some(v) = self.task_deadline {
            settings.notifications.task_deadline = v;
        }
        if let Some(v) = self.mentor_help {
            settings.notifications.mentor_help = v;
        }
    }
}

fn take_string(
    body: &Value,
    key: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match body.get(key) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(key, message));
            None
        }
    }
}

fn take_bool(
    obj: &Value,
    key: &str,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<bool> {
    match obj.get(key) {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}
