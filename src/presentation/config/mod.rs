mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{AnalysisSettings, LoggingSettings, ServerSettings, Settings, StorageSettings};
