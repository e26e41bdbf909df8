use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::{ArtifactMeta, ArtifactName, StagedArtifact, UploadMeta};

pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
    max_payload_bytes: u64,
}

impl LocalArtifactStore {
    pub fn new(base_path: PathBuf, max_payload_bytes: u64) -> Result<Self, ArtifactStoreError> {
        // Create-if-absent: safe to race across concurrent starts.
        std::fs::create_dir_all(&base_path).map_err(ArtifactStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
            max_payload_bytes,
        })
    }

    fn location(name: &ArtifactName) -> StorePath {
        StorePath::from(name.as_str())
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn stage(
        &self,
        upload: &UploadMeta,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<StagedArtifact, ArtifactStoreError> {
        let name = ArtifactName::generate(&upload.field_name, &upload.original_name);
        let location = Self::location(&name);

        let mut write = self
            .inner
            .put_multipart(&location)
            .await
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = write.abort().await;
                    return Err(ArtifactStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if total_bytes > self.max_payload_bytes {
                let _ = write.abort().await;
                return Err(ArtifactStoreError::PayloadTooLarge {
                    limit_bytes: self.max_payload_bytes,
                });
            }
            if let Err(e) = write.put_part(PutPayload::from(bytes)).await {
                let _ = write.abort().await;
                return Err(ArtifactStoreError::UploadFailed(e.to_string()));
            }
        }

        write
            .complete()
            .await
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

        let path = self.base_path.join(name.as_str());
        Ok(StagedArtifact {
            name,
            original_name: upload.original_name.clone(),
            media_type: upload.declared_mime.clone(),
            path,
            size_bytes: total_bytes,
            uploaded_at: Utc::now(),
        })
    }

    async fn describe(&self, name: &ArtifactName) -> Result<ArtifactMeta, ArtifactStoreError> {
        let meta = self
            .inner
            .head(&Self::location(name))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    ArtifactStoreError::NotFound(name.to_string())
                }
                other => ArtifactStoreError::DownloadFailed(other.to_string()),
            })?;

        Ok(ArtifactMeta {
            name: name.clone(),
            size_bytes: meta.size as u64,
            uploaded_at: meta.last_modified,
        })
    }

    async fn fetch(&self, name: &ArtifactName) -> Result<Vec<u8>, ArtifactStoreError> {
        let result = self
            .inner
            .get(&Self::location(name))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    ArtifactStoreError::NotFound(name.to_string())
                }
                other => ArtifactStoreError::DownloadFailed(other.to_string()),
            })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| ArtifactStoreError::DownloadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn open(
        &self,
        name: &ArtifactName,
    ) -> Result<BoxStream<'static, Result<Bytes, io::Error>>, ArtifactStoreError> {
        let result = self
            .inner
            .get(&Self::location(name))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    ArtifactStoreError::NotFound(name.to_string())
                }
                other => ArtifactStoreError::DownloadFailed(other.to_string()),
            })?;

        Ok(result
            .into_stream()
            .map(|chunk| chunk.map_err(io::Error::other))
            .boxed())
    }

    async fn list(&self) -> Result<Vec<ArtifactMeta>, ArtifactStoreError> {
        let mut entries = self.inner.list(None);
        let mut artifacts = Vec::new();

        while let Some(entry) = entries.next().await {
            let meta = entry.map_err(|e| ArtifactStoreError::DownloadFailed(e.to_string()))?;
            let Some(filename) = meta.location.filename() else {
                continue;
            };
            let Some(name) = ArtifactName::parse(filename) else {
                continue;
            };
            artifacts.push(ArtifactMeta {
                name,
                size_bytes: meta.size as u64,
                uploaded_at: meta.last_modified,
            });
        }

        Ok(artifacts)
    }

    async fn delete(&self, name: &ArtifactName) -> Result<(), ArtifactStoreError> {
        self.inner
            .delete(&Self::location(name))
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => {
                    ArtifactStoreError::NotFound(name.to_string())
                }
                other => ArtifactStoreError::DeleteFailed(other.to_string()),
            })
    }
}
