use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned identity of a todo. Backends hand out either integers or
/// opaque strings; both are carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl FromStr for TodoId {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Ok(trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_string()), Self::Number))
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
}

/// Request body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoPayload<'a> {
    pub title: &'a str,
}

/// Ingests one wire row. `id` wins over `_id`; a row with neither, or with a
/// non-string title, has no usable identity and is rejected.
#[must_use]
pub fn normalize_todo(row: &Value) -> Option<Todo> {
    let object = row.as_object()?;
    let id = ["id", "_id"]
        .iter()
        .find_map(|field| object.get(*field).and_then(identity_from_value))?;
    let title = object.get("title")?.as_str()?.to_string();
    Some(Todo { id, title })
}

/// Ingests a list body. Anything other than a JSON array reads as an empty
/// collection.
#[must_use]
pub fn normalize_todo_list(body: &Value) -> Vec<Todo> {
    let Some(rows) = body.as_array() else {
        tracing::warn!("todo list body is not an array; treating as empty");
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let todo = normalize_todo(row);
            if todo.is_none() {
                tracing::warn!("dropping todo row without identity or title");
            }
            todo
        })
        .collect()
}

fn identity_from_value(value: &Value) -> Option<TodoId> {
    match value {
        Value::Number(number) => Some(
            number
                .as_i64()
                .map_or_else(|| TodoId::Text(number.to_string()), TodoId::Number),
        ),
        Value::String(text) if !text.is_empty() => Some(TodoId::Text(text.clone())),
        _ => None,
    }
}
