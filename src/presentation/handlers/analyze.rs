use axum::Json;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::{AnalysisEngine, ArtifactStore};
use crate::application::services::PipelineError;
use crate::domain::ArtifactName;
use crate::presentation::state::AppState;

use super::form::{read_upload_form, required_params};
use super::responses::{ErrorResponse, error_response};

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub analysis: Value,
}

#[derive(Deserialize)]
pub struct AnalyzeReferenceBody {
    pub filename: Option<String>,
    pub domain: Option<String>,
    pub paragraph_number: Option<Value>,
}

const MISSING_FIELDS: &str = "Missing required fields: filename, domain, paragraph_number";

/// The endpoint accepts two request shapes distinguished by content type: a
/// multipart body carrying a fresh upload, or JSON referencing an already
/// staged artifact. The variant is resolved once, here.
#[tracing::instrument(skip(state, request))]
pub async fn analyze_handler<S, A>(State(state): State<AppState<S, A>>, request: Request) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if is_multipart {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => analyze_inline(state, multipart).await,
            Err(rejection) => (
                rejection.status(),
                Json(ErrorResponse::new(rejection.body_text())),
            )
                .into_response(),
        }
    } else {
        match Json::<AnalyzeReferenceBody>::from_request(request, &()).await {
            Ok(Json(body)) => analyze_reference(state, body).await,
            Err(rejection) => (
                rejection.status(),
                Json(ErrorResponse::new(rejection.body_text())),
            )
                .into_response(),
        }
    }
}

async fn analyze_inline<S, A>(state: AppState<S, A>, multipart: Multipart) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let form = match read_upload_form(multipart).await {
        Ok(f) => f,
        Err(response) => return response,
    };

    let params = match required_params(
        form.domain,
        form.paragraph_number.map(Value::String),
        MISSING_FIELDS,
    ) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let Some((upload, data)) = form.file else {
        return error_response(PipelineError::Validation(MISSING_FIELDS.to_string()));
    };

    // A fresh upload on this path is staged first, then analyzed by name. A
    // failed analysis leaves it staged; only combined mode cleans up.
    let artifact = match state.pipeline.stage_upload(&upload, data).await {
        Ok(a) => a,
        Err(err) => return error_response(err),
    };

    match state.pipeline.analyze_artifact(&artifact.name, &params).await {
        Ok(result) => word_lists_response(result),
        Err(err) => error_response(err),
    }
}

async fn analyze_reference<S, A>(state: AppState<S, A>, body: AnalyzeReferenceBody) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let params = match required_params(body.domain, body.paragraph_number, MISSING_FIELDS) {
        Ok(p) => p,
        Err(response) => return response,
    };

    let Some(filename) = body.filename.filter(|f| !f.is_empty()) else {
        return error_response(PipelineError::Validation(MISSING_FIELDS.to_string()));
    };

    let Some(name) = ArtifactName::parse(&filename) else {
        return error_response(PipelineError::Validation(format!(
            "Invalid filename: {}",
            filename
        )));
    };

    match state.pipeline.analyze_artifact(&name, &params).await {
        Ok(result) => word_lists_response(result),
        Err(err) => error_response(err),
    }
}

// Only the word_lists portion of the analysis payload is surfaced on this
// path; the combined endpoint returns the full payload. Existing clients
// depend on both shapes.
fn word_lists_response(result: Value) -> Response {
    let analysis = result.get("word_lists").cloned().unwrap_or(Value::Null);
    (StatusCode::OK, Json(AnalyzeResponse { analysis })).into_response()
}
