mod analysis_engine;
mod artifact_store;

pub use analysis_engine::{AnalysisEngine, AnalysisError};
pub use artifact_store::{ArtifactStore, ArtifactStoreError};
