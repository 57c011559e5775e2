//! Error types for the page layer.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use catalog_store::StoreError;
use thiserror::Error;
use tracing::error;

use crate::templates::{ErrorTemplate, Layout};

/// Page rendering errors.
#[derive(Debug, Error)]
pub enum WebError {
    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The data store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Template rendering error.
    #[error("template error: {0}")]
    Template(String),
}

impl WebError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Store(_) => StatusCode::BAD_GATEWAY,
            WebError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            WebError::NotFound(msg) => msg.clone(),
            WebError::Store(err) => {
                error!(error = %err, "Store request failed");
                "The catalog is temporarily unavailable.".to_string()
            }
            WebError::Template(msg) => {
                error!(error = %msg, "Template rendering failed");
                "Something went wrong while rendering this page.".to_string()
            }
        };

        let page = ErrorTemplate {
            layout: Layout::default(),
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => (status, self.to_string()).into_response(),
        }
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        WebError::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            WebError::NotFound("Asset not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::Store(StoreError::InvalidResponse("x".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            WebError::Template("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_renders_bad_gateway() {
        let response = WebError::Store(StoreError::Backend {
            status: 500,
            message: "password authentication failed".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
