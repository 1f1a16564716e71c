//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the two serving artifacts live.
///
/// The artifact set is fixed per process lifetime: one fitted transform,
/// one trained model, each a single serialized object at a configured
/// local path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path of the fitted preprocessing transform
    pub transform_path: PathBuf,

    /// Path of the trained model
    pub model_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transform_path: PathBuf::from("artifacts/preprocessor.json"),
            model_path: PathBuf::from("artifacts/model.json"),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with the default artifact layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the transform path
    pub fn with_transform_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.transform_path = path.into();
        self
    }

    /// Builder method to set the model path
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }
}
