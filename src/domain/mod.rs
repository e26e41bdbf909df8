mod analysis;
mod artifact;
mod artifact_name;
mod media_type;

pub use analysis::AnalysisRequest;
pub use artifact::{ArtifactMeta, StagedArtifact, UploadMeta};
pub use artifact_name::ArtifactName;
pub use media_type::{WAV_MIME, is_wav_upload};
