use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;

use crate::application::services::PipelineError;
use crate::domain::{AnalysisRequest, UploadMeta};

use super::responses::{ErrorResponse, error_response};

pub const AUDIO_FIELD: &str = "audio_file";

/// Everything a pipeline endpoint can carry in one multipart body, drained
/// once at the boundary so validation happens before any side effect.
#[derive(Default)]
pub struct UploadForm {
    pub file: Option<(UploadMeta, Bytes)>,
    pub domain: Option<String>,
    pub paragraph_number: Option<String>,
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Response> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(e)),
        };
        let Some(field_name) = field.name().map(String::from) else {
            continue;
        };
        match field_name.as_str() {
            AUDIO_FIELD => {
                let original_name = field.file_name().unwrap_or("unknown").to_string();
                let declared_mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                form.file = Some((
                    UploadMeta {
                        field_name,
                        original_name,
                        declared_mime,
                    },
                    data,
                ));
            }
            "domain" => {
                form.domain = Some(field.text().await.map_err(multipart_error)?);
            }
            "paragraph_number" => {
                form.paragraph_number = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Presence check for the delegate parameters, run before any storage or
/// network operation. JSON numbers are normalized to their text rendering,
/// since the downstream contract takes the field as a text part.
pub fn required_params(
    domain: Option<String>,
    paragraph_number: Option<Value>,
    missing_message: &str,
) -> Result<AnalysisRequest, Response> {
    let domain = domain.filter(|d| !d.trim().is_empty());
    let paragraph_number = paragraph_number.and_then(render_paragraph_number);

    match (domain, paragraph_number) {
        (Some(domain), Some(paragraph_number)) => Ok(AnalysisRequest {
            domain,
            paragraph_number,
        }),
        _ => Err(error_response(PipelineError::Validation(
            missing_message.to_string(),
        ))),
    }
}

fn render_paragraph_number(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn multipart_error(err: MultipartError) -> Response {
    tracing::warn!(error = %err, "Failed to read multipart body");
    (
        err.status(),
        Json(ErrorResponse::new(format!(
            "Failed to read multipart body: {}",
            err.body_text()
        ))),
    )
        .into_response()
}
