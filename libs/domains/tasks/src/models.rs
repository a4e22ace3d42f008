use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A task in the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Server-assigned id (UUID v7, so ids sort by creation time)
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
}

/// Body of `POST /tasks`, also the unit of bulk insertion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewTask {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>, completed: bool) -> Self {
        Self {
            title: title.into(),
            completed,
        }
    }
}

/// Body of `PUT /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,
    pub completed: bool,
}

/// Upsert input for the repository.
///
/// `id: None` inserts a new task, `id: Some` overwrites an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SaveTask {
    pub id: Option<Uuid>,
    #[validate(
        length(max = 255, message = "Title must be at most 255 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,
    pub completed: bool,
}

impl From<NewTask> for SaveTask {
    fn from(input: NewTask) -> Self {
        Self {
            id: None,
            title: input.title,
            completed: input.completed,
        }
    }
}

impl SaveTask {
    pub fn existing(id: Uuid, input: UpdateTask) -> Self {
        Self {
            id: Some(id),
            title: input.title,
            completed: input.completed,
        }
    }
}

/// Sort order for listing
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskOrder {
    /// Incomplete tasks first
    CompletedAsc,
    /// Completed tasks first
    CompletedDesc,
}

/// Query filter for listing tasks.
///
/// Results are ordered by id unless `order_by` is given; `order_by` ties are
/// also broken by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TaskFilter {
    /// Only tasks with this completion state
    pub completed: Option<bool>,
    pub order_by: Option<TaskOrder>,
    /// Maximum number of tasks returned
    pub limit: Option<u64>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.completed.is_none_or(|completed| task.completed == completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CountResponse {
    pub count: u64,
}

/// Body of `POST /TasksController/setAll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SetAllRequest {
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SetAllResponse {
    /// Number of tasks written
    pub updated: u64,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_fails_validation() {
        for title in ["", "   ", "\t"] {
            let errors = NewTask::new(title, false).validate().unwrap_err();
            assert!(errors.field_errors().contains_key("title"), "{title:?}");
        }
    }

    #[test]
    fn test_long_title_fails_validation() {
        let title = "x".repeat(256);
        assert!(NewTask::new(title, false).validate().is_err());
        assert!(NewTask::new("x".repeat(255), false).validate().is_ok());
    }

    #[test]
    fn test_new_task_completed_defaults_to_false() {
        let task: NewTask = serde_json::from_str(r#"{"title":"Task a"}"#).unwrap();
        assert!(!task.completed);
    }

    #[test]
    fn test_task_order_parses_snake_case() {
        let filter: TaskFilter =
            serde_json::from_str(r#"{"order_by":"completed_asc","limit":20}"#).unwrap();
        assert_eq!(filter.order_by, Some(TaskOrder::CompletedAsc));
        assert_eq!(filter.limit, Some(20));
        assert_eq!("completed_desc".parse::<TaskOrder>().unwrap(), TaskOrder::CompletedDesc);
    }

    #[test]
    fn test_filter_matches_completion() {
        let task = Task {
            id: Uuid::now_v7(),
            title: "Task b".to_string(),
            completed: true,
        };
        assert!(TaskFilter::default().matches(&task));
        assert!(!TaskFilter {
            completed: Some(false),
            ..Default::default()
        }
        .matches(&task));
    }
}
