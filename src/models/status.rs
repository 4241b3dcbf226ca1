//! Status record models exchanged with the backend under test

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/status`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCreate {
    pub client_name: String,
}

impl StatusCreate {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }
}

/// Status record as returned by the backend
///
/// The id and timestamp are generated server side and kept as raw JSON; the
/// checker only reports them. Absent fields read as null.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: Value,
    pub client_name: Value,
    pub timestamp: Value,
}

impl StatusRecord {
    /// Names of the fields every record must carry
    pub const REQUIRED_FIELDS: [&'static str; 3] = ["id", "client_name", "timestamp"];

    /// Required fields absent from a JSON object; present nulls count as present
    pub fn missing_fields(value: &Value) -> Vec<&'static str> {
        Self::REQUIRED_FIELDS
            .iter()
            .copied()
            .filter(|field| value.get(field).is_none())
            .collect()
    }

    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).cloned().unwrap_or(Value::Null);
        Self {
            id: field("id"),
            client_name: field("client_name"),
            timestamp: field("timestamp"),
        }
    }

    /// Whether the record echoes `name` back as a JSON string
    pub fn echoes(&self, name: &str) -> bool {
        self.client_name.as_str() == Some(name)
    }
}
