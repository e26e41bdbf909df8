mod pipeline;

pub use pipeline::{PipelineError, PipelineService};
