//! The JSON envelope returned by every API endpoint.

use serde::{Deserialize, Serialize};

/// The response body shared by all endpoints.
///
/// Successful responses carry the owner's full expense collection in `data`
/// so the client can replace its in-memory list wholesale. Failure responses
/// omit `data` and set `success` to `false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// A human-readable description of the outcome.
    pub message: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// The payload, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response carrying `data`.
    pub fn with_data(message: &str, data: T) -> Self {
        Self {
            message: message.to_owned(),
            success: true,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Create a successful response with no payload.
    pub fn message_only(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            success: true,
            data: None,
        }
    }
}
