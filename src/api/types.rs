//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to run the agent on a query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// The natural-language question
    pub query: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Error body for rejected requests and failed runs.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
