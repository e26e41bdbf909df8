use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::application::services::PipelineError;
use crate::domain::StagedArtifact;

/// Error envelope shared by every endpoint: a success flag, a human-readable
/// message, and for upstream rejections the analysis service's own body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }
}

/// Stage-time file metadata, serialized the way clients already consume it.
#[derive(Serialize)]
pub struct FileInfo {
    #[serde(rename = "originalName")]
    pub original_name: String,
    pub filename: String,
    pub path: String,
    pub size: u64,
    pub mimetype: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: String,
}

impl From<&StagedArtifact> for FileInfo {
    fn from(artifact: &StagedArtifact) -> Self {
        Self {
            original_name: artifact.original_name.clone(),
            filename: artifact.name.to_string(),
            path: artifact.path.display().to_string(),
            size: artifact.size_bytes,
            mimetype: artifact.media_type.clone(),
            uploaded_at: artifact.uploaded_at.to_rfc3339(),
        }
    }
}

pub fn error_response(err: PipelineError) -> Response {
    match err {
        PipelineError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
        }
        PipelineError::UnsupportedMediaType(declared) => {
            tracing::warn!(declared = %declared, "Upload rejected by ingress filter");
            (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorResponse::new("Only .wav files are allowed!")),
            )
                .into_response()
        }
        PipelineError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Audio file not found")),
        )
            .into_response(),
        PipelineError::PayloadTooLarge { limit_bytes } => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(ErrorResponse::new(format!(
                "File exceeds the {} byte limit",
                limit_bytes
            ))),
        )
            .into_response(),
        PipelineError::Upstream { status, body } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(ErrorResponse {
                    success: false,
                    message: "Analysis API error".to_string(),
                    error: Some(body),
                }),
            )
                .into_response()
        }
        PipelineError::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Analysis service unavailable")),
        )
            .into_response(),
        PipelineError::Internal(message) => {
            tracing::error!(error = %message, "Pipeline failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Internal server error")),
            )
                .into_response()
        }
    }
}
