mod environment;
mod pipeline;
mod types;

pub use pipeline::Pipeline;
pub use types::{
    InstallCheck, PipelineOutcome, PublishOutcome, StageOutput, StageRecord, WheelArtifact,
};
