//! Shared Response Envelope
//!
//! All nodes answer with the same JSON shape:
//! `{success, message?, data?, order?, invalidated_keys?}`.
//! Absent fields are omitted from the wire.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalidated_keys: Option<Vec<String>>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Serializes `data` into the `data` field. A value that cannot be
    /// represented as JSON leaves the field empty.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.data = Some(value),
            Err(e) => tracing::warn!("Failed to serialize response data: {}", e),
        }
        self
    }

    pub fn with_order<T: Serialize>(mut self, order: &T) -> Self {
        match serde_json::to_value(order) {
            Ok(value) => self.order = Some(value),
            Err(e) => tracing::warn!("Failed to serialize order: {}", e),
        }
        self
    }
}

/// `{old, new}` pair returned by every catalog mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change<T> {
    pub old: T,
    pub new: T,
}
