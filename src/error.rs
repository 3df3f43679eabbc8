use crate::engine::pipeline::Stage;
use thiserror::Error;

/// Errors surfaced by pipeline runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// None of the primary credentials are present.
    #[error("missing configuration, required: {}", .required.join(", "))]
    ConfigurationMissing { required: Vec<&'static str> },

    /// A stage of the run failed.
    #[error("{stage}: {message}")]
    StageFailure { stage: Stage, message: String },

    /// Another run is still in flight.
    #[error("a pipeline run is already in progress")]
    RunInProgress,
}

impl PipelineError {
    pub fn stage(stage: Stage, err: anyhow::Error) -> Self {
        PipelineError::StageFailure {
            stage,
            message: format!("{:#}", err),
        }
    }
}
