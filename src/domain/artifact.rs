use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::ArtifactName;

/// What the client declared about an inbound upload.
#[derive(Debug, Clone)]
pub struct UploadMeta {
    pub field_name: String,
    pub original_name: String,
    pub declared_mime: String,
}

/// Record produced at stage time, while the declared metadata is still known.
#[derive(Debug, Clone)]
pub struct StagedArtifact {
    pub name: ArtifactName,
    pub original_name: String,
    pub media_type: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Record derived from a filesystem stat at read time. There is no sidecar
/// metadata, so the declared filename and media type are not recoverable here.
#[derive(Debug, Clone)]
pub struct ArtifactMeta {
    pub name: ArtifactName,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}
