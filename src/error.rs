use axum::http::StatusCode;
use thiserror::Error;

/// Every failure the dashboard can surface. `Display` is the single
/// human-readable string shown in place of content.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// Logical error reported inside an otherwise successful response
    #[error("{0}")]
    Upstream(String),

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("{0}")]
    InvalidAddress(String),

    #[error("Entity ID is required")]
    MissingEntityId,

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DashboardError {
    /// Status used when the error is returned from one of our own routes
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::InvalidAddress(_) | DashboardError::MissingEntityId => {
                StatusCode::BAD_REQUEST
            }
            DashboardError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::HttpStatus { .. }
            | DashboardError::Upstream(_)
            | DashboardError::GraphQl(_)
            | DashboardError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
