use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::{AnalysisEngine, ArtifactStore};
use crate::presentation::state::AppState;

use super::form::{read_upload_form, required_params};
use super::responses::{ErrorResponse, FileInfo, error_response};

#[derive(Serialize)]
pub struct UploadAndAnalyzeResponse {
    pub success: bool,
    pub message: String,
    pub file: FileInfo,
    pub analysis: Value,
    pub parameters: AnalysisParameters,
}

#[derive(Serialize)]
pub struct AnalysisParameters {
    pub domain: String,
    pub paragraph_number: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_and_analyze_handler<S, A>(
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
        tracing::warn!("Combined request with no file");
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No file uploaded")),
        )
            .into_response();
    };

    let params = match required_params(
        form.domain,
        form.paragraph_number.map(Value::String),
        "Missing required fields: domain, paragraph_number",
    ) {
        Ok(p) => p,
        Err(response) => return response,
    };

    match state.pipeline.upload_and_analyze(&upload, data, &params).await {
        Ok((artifact, analysis)) => (
            StatusCode::OK,
            Json(UploadAndAnalyzeResponse {
                success: true,
                message: "File uploaded and analyzed successfully".to_string(),
                file: FileInfo::from(&artifact),
                analysis,
                parameters: AnalysisParameters {
                    domain: params.domain,
                    paragraph_number: params.paragraph_number,
                },
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}
