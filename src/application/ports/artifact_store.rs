use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::{ArtifactMeta, ArtifactName, StagedArtifact, UploadMeta};

#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persists the full stream under a freshly generated name. The partial
    /// file must not survive a failed write.
    async fn stage(
        &self,
        upload: &UploadMeta,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<StagedArtifact, ArtifactStoreError>;

    async fn describe(&self, name: &ArtifactName) -> Result<ArtifactMeta, ArtifactStoreError>;

    async fn fetch(&self, name: &ArtifactName) -> Result<Vec<u8>, ArtifactStoreError>;

    async fn open(
        &self,
        name: &ArtifactName,
    ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, ArtifactStoreError>;

    /// Enumeration order of the backing directory; callers must not depend
    /// on it.
    async fn list(&self) -> Result<Vec<ArtifactMeta>, ArtifactStoreError>;

    async fn delete(&self, name: &ArtifactName) -> Result<(), ArtifactStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("payload exceeds {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: u64 },
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
