use std::io;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream;
use serde_json::Value;

use crate::application::ports::{
    AnalysisEngine, AnalysisError, ArtifactStore, ArtifactStoreError,
};
use crate::domain::{AnalysisRequest, ArtifactName, StagedArtifact, UploadMeta, is_wav_upload};

pub struct PipelineService<S, A>
where
    S: ArtifactStore,
    A: AnalysisEngine,
{
    store: Arc<S>,
    engine: Arc<A>,
}

impl<S, A> PipelineService<S, A>
where
    S: ArtifactStore,
    A: AnalysisEngine,
{
    pub fn new(store: Arc<S>, engine: Arc<A>) -> Self {
        Self { store, engine }
    }

    /// Upload-only mode: ingress filter, then stage. Nothing is written for
    /// a rejected upload.
    pub async fn stage_upload(
        &self,
        upload: &UploadMeta,
        data: Bytes,
    ) -> Result<StagedArtifact, PipelineError> {
        if !is_wav_upload(Some(&upload.declared_mime), &upload.original_name) {
            return Err(PipelineError::UnsupportedMediaType(
                upload.declared_mime.clone(),
            ));
        }

        let chunks: Vec<Result<Bytes, io::Error>> = vec![Ok(data)];
        let artifact = self.store.stage(upload, Box::pin(stream::iter(chunks))).await?;

        tracing::info!(
            artifact = %artifact.name,
            original_name = %artifact.original_name,
            size_bytes = artifact.size_bytes,
            "Artifact staged"
        );

        Ok(artifact)
    }

    /// Analyze-existing mode: the referenced artifact must already be staged;
    /// storage is never mutated.
    pub async fn analyze_artifact(
        &self,
        name: &ArtifactName,
        request: &AnalysisRequest,
    ) -> Result<Value, PipelineError> {
        let audio = self.store.fetch(name).await?;
        let result = self.engine.analyze(&audio, name.as_str(), request).await?;

        tracing::info!(artifact = %name, domain = %request.domain, "Artifact analyzed");

        Ok(result)
    }

    /// Combined mode: an artifact that failed analysis has no value, so the
    /// staged file is removed before the error propagates.
    pub async fn upload_and_analyze(
        &self,
        upload: &UploadMeta,
        data: Bytes,
        request: &AnalysisRequest,
    ) -> Result<(StagedArtifact, Value), PipelineError> {
        let artifact = self.stage_upload(upload, data.clone()).await?;

        match self
            .engine
            .analyze(&data, artifact.name.as_str(), request)
            .await
        {
            Ok(result) => {
                tracing::info!(
                    artifact = %artifact.name,
                    domain = %request.domain,
                    "Artifact uploaded and analyzed"
                );
                Ok((artifact, result))
            }
            Err(err) => {
                // Cleanup failure is logged, never allowed to mask the
                // delegate error.
                match self.store.delete(&artifact.name).await {
                    Ok(()) => {
                        tracing::debug!(
                            artifact = %artifact.name,
                            "Removed staged artifact after analysis failure"
                        );
                    }
                    Err(cleanup) => {
                        tracing::warn!(
                            artifact = %artifact.name,
                            error = %cleanup,
                            "Failed to remove staged artifact after analysis failure"
                        );
                    }
                }
                Err(err.into())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("payload exceeds {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: u64 },
    #[error("analysis service rejected the request: status {status}")]
    Upstream { status: u16, body: Value },
    #[error("analysis service unavailable")]
    Unavailable,
    #[error("{0}")]
    Internal(String),
}

impl From<ArtifactStoreError> for PipelineError {
    fn from(err: ArtifactStoreError) -> Self {
        match err {
            ArtifactStoreError::NotFound(m) => PipelineError::NotFound(m),
            ArtifactStoreError::PayloadTooLarge { limit_bytes } => {
                PipelineError::PayloadTooLarge { limit_bytes }
            }
            other => PipelineError::Internal(other.to_string()),
        }
    }
}

impl From<AnalysisError> for PipelineError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Upstream { status, body } => PipelineError::Upstream { status, body },
            AnalysisError::Unavailable(_) => PipelineError::Unavailable,
            AnalysisError::Internal(m) => PipelineError::Internal(m),
        }
    }
}
