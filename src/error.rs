use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ledgerdesk_core::StoreError;
use ledgerdesk_workspace::WorkspaceError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("workspace state could not be saved: {0}")]
    Workspace(#[from] WorkspaceError),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

fn json_error(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { success: false, error })).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ApiError::Store(StoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::Store(StoreError::Validation(_)) | ApiError::Body(_) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            ApiError::Store(StoreError::InvalidTransition { .. }) => json_error(StatusCode::CONFLICT, message),
            ApiError::Workspace(e) => {
                tracing::error!(error = %e, "Workspace persistence failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}
