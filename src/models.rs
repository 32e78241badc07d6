use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub date_of_creation: Option<String>,
    pub date_of_completion: Option<String>,
    pub image_link: Option<String>,
}

/// A create/update body after structural validation.
#[derive(Debug, Clone)]
pub struct TodoPayload {
    pub title: String,
    pub completed: Option<bool>,
    pub date_of_creation: Option<String>,
    pub date_of_completion: Option<String>,
    pub image_link: Option<String>,
}

impl TodoPayload {
    /// Checks a raw JSON body against the todo schema: `title` is a
    /// required non-empty string, `completed` a boolean, the two dates
    /// RFC 3339 strings, `imageLink` a string. Optional fields may be
    /// absent or null; unknown keys are ignored.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let obj = body
            .as_object()
            .ok_or(AppError::Validation("body must be an object"))?;

        let title = obj
            .get("title")
            .and_then(Value::as_str)
            .ok_or(AppError::Validation("title is required"))?;
        if title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty"));
        }

        let completed = match obj.get("completed") {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err(AppError::Validation("completed must be a boolean")),
        };

        let date_of_creation = opt_timestamp(obj.get("dateOfCreation"), "dateOfCreation")?;
        let date_of_completion = opt_timestamp(obj.get("dateOfCompletion"), "dateOfCompletion")?;

        let image_link = match obj.get("imageLink") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(AppError::Validation("imageLink must be a string")),
        };

        Ok(TodoPayload {
            title: title.to_string(),
            completed,
            date_of_creation,
            date_of_completion,
            image_link,
        })
    }
}

fn opt_timestamp(value: Option<&Value>, field: &'static str) -> Result<Option<String>, AppError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            OffsetDateTime::parse(s, &Rfc3339).map_err(|_| AppError::Validation(field))?;
            Ok(Some(s.clone()))
        }
        Some(_) => Err(AppError::Validation(field)),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTodos {
    pub total_completed: usize,
    pub total_not_completed: usize,
    pub todos: Vec<Todo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedTodo {
    pub id: i64,
}

/// Acknowledgment shape shared by update, markComplete and delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowsAffected {
    pub rows_affected: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_minimal_body() {
        let payload = TodoPayload::from_value(&json!({"title": "buy milk"})).unwrap();
        assert_eq!(payload.title, "buy milk");
        assert_eq!(payload.completed, None);
        assert_eq!(payload.date_of_creation, None);
        assert_eq!(payload.image_link, None);
    }

    #[test]
    fn accepts_full_body() {
        let payload = TodoPayload::from_value(&json!({
            "title": "buy milk",
            "completed": true,
            "dateOfCreation": "2024-05-01T10:00:00.000Z",
            "dateOfCompletion": "2024-05-02T10:00:00.000Z",
            "imageLink": "https://example.com/milk.png",
        }))
        .unwrap();
        assert_eq!(payload.completed, Some(true));
        assert_eq!(
            payload.date_of_creation.as_deref(),
            Some("2024-05-01T10:00:00.000Z")
        );
    }

    #[test]
    fn rejects_missing_or_empty_title() {
        assert!(TodoPayload::from_value(&json!({})).is_err());
        assert!(TodoPayload::from_value(&json!({"title": ""})).is_err());
        assert!(TodoPayload::from_value(&json!({"title": "   "})).is_err());
        assert!(TodoPayload::from_value(&json!({"title": 42})).is_err());
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        assert!(TodoPayload::from_value(&json!({"title": "x", "completed": "yes"})).is_err());
        assert!(
            TodoPayload::from_value(&json!({"title": "x", "dateOfCreation": "not a date"})).is_err()
        );
        assert!(TodoPayload::from_value(&json!({"title": "x", "imageLink": 5})).is_err());
        assert!(TodoPayload::from_value(&json!("just a string")).is_err());
    }

    #[test]
    fn null_optionals_are_absent() {
        let payload = TodoPayload::from_value(&json!({
            "title": "x",
            "completed": null,
            "dateOfCreation": null,
            "imageLink": null,
        }))
        .unwrap();
        assert_eq!(payload.completed, None);
        assert_eq!(payload.date_of_creation, None);
        assert_eq!(payload.image_link, None);
    }
}
