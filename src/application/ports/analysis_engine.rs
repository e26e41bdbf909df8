use async_trait::async_trait;
use serde_json::Value;

use crate::domain::AnalysisRequest;

#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Synchronous, bounded-duration call to the analysis service. The result
    /// is passed through opaque; the pipeline never interprets its shape.
    async fn analyze(
        &self,
        audio_data: &[u8],
        file_name: &str,
        request: &AnalysisRequest,
    ) -> Result<Value, AnalysisError>;
}

/// The three-way split lets callers distinguish "the service rejected the
/// input" from "the service is unreachable" from "our own fault".
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis service rejected the request: status {status}")]
    Upstream { status: u16, body: Value },
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),
    #[error("analysis request failed: {0}")]
    Internal(String),
}
