use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{AnalysisEngine, ArtifactStore};
use crate::presentation::state::AppState;

use super::form::read_upload_form;
use super::responses::{ErrorResponse, FileInfo, error_response};

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file: FileInfo,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler<S, A>(
    State(state): State<AppState<S, A>>,
    multipart: Multipart,
) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let form = match read_upload_form(multipart).await {
        Ok(f) => f,
        Err(response) => return response,
    };

    let Some((upload, data)) = form.file else {
        tracing::warn!("Upload request with no file");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No file uploaded")),
        )
            .into_response();
    };

    match state.pipeline.stage_upload(&upload, data).await {
        Ok(artifact) => (
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                message: "WAV file uploaded successfully".to_string(),
                file: FileInfo::from(&artifact),
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
