//! Model application and request orchestration
//!
//! [`Predictor`] applies the trained model to one encoded vector;
//! [`InferencePipeline`] strings validation, artifact resolution, encoding,
//! and prediction together for one request and is the only component the
//! presentation layer calls.

mod config;
mod model;
mod pipeline;

pub use config::PipelineConfig;
pub use model::{
    PredictionResult, Predictor, TrainedModel, MODEL_SCHEMA_VERSION, MODEL_TAG,
};
pub use pipeline::InferencePipeline;
