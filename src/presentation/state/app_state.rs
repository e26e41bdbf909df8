use std::sync::Arc;

use crate::application::ports::{AnalysisEngine, ArtifactStore};
use crate::application::services::PipelineService;
use crate::presentation::config::Settings;

pub struct AppState<S, A>
where
    S: ArtifactStore,
    A: AnalysisEngine,
{
    pub pipeline: Arc<PipelineService<S, A>>,
    pub store: Arc<S>,
    pub settings: Settings,
}

impl<S, A> Clone for AppState<S, A>
where
    S: ArtifactStore,
    A: AnalysisEngine,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            store: Arc::clone(&self.store),
            settings: self.settings.clone(),
        }
    }
}
