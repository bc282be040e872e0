//! Dated to-do task record.

use crate::util::id::new_record_id;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stored data may carry numeric ids; they load as their decimal text.
    /// A missing id loads as empty and is assigned by the task service.
    #[serde(default, deserialize_with = "deserialize_task_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            date: date.into(),
            done: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTaskId {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn deserialize_task_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawTaskId::deserialize(deserializer)? {
        RawTaskId::Text(value) => value,
        RawTaskId::Integer(value) => value.to_string(),
        RawTaskId::Float(value) => value.to_string(),
    })
}
