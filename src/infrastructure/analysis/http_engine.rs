use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;

use crate::application::ports::{AnalysisEngine, AnalysisError};
use crate::domain::{AnalysisRequest, WAV_MIME};

pub struct HttpAnalysisEngine {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAnalysisEngine {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl AnalysisEngine for HttpAnalysisEngine {
    async fn analyze(
        &self,
        audio_data: &[u8],
        file_name: &str,
        request: &AnalysisRequest,
    ) -> Result<Value, AnalysisError> {
        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(WAV_MIME)
            .map_err(|e| AnalysisError::Internal(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .part("audio_file", file_part)
            .text("domain", request.domain.clone())
            .text("paragraph_number", request.paragraph_number.clone());

        tracing::debug!(
            endpoint = %self.endpoint,
            domain = %request.domain,
            paragraph_number = %request.paragraph_number,
            "Sending audio to analysis service"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_send_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            // Pass the service's own diagnostic through verbatim.
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(AnalysisError::Upstream { status, body });
        }

        let result: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::Internal(format!("parse response: {}", e)))?;

        tracing::info!(domain = %request.domain, "Analysis completed");

        Ok(result)
    }
}

// A fired timeout is indistinguishable from an unreachable service as far as
// callers are concerned.
fn classify_send_error(err: reqwest::Error) -> AnalysisError {
    if err.is_timeout() || err.is_connect() {
        AnalysisError::Unavailable(err.to_string())
    } else {
        AnalysisError::Internal(format!("request: {}", err))
    }
}
