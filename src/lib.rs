//! Studentperf - Inference serving for the student performance model
//!
//! This crate is the serving core behind the student performance front end:
//! it takes one structured request, re-creates the exact tabular feature
//! layout used at training time, applies the fitted preprocessing transform,
//! and invokes the trained model.
//!
//! # Modules
//!
//! - [`record`] - Feature record data model: closed categorical
//!   vocabularies, score bounds, request validation
//! - [`artifact`] - Versioned artifact loading with a load-once,
//!   single-flight cache
//! - [`preprocessing`] - Fitted transform artifact and the feature
//!   encoder that reproduces training-time column order
//! - [`inference`] - Trained model artifact, the predictor, and the
//!   pipeline that orchestrates one request end to end
//!
//! # Example
//!
//! ```no_run
//! use studentperf::{FeatureRecord, InferencePipeline, PipelineConfig};
//!
//! let pipeline = InferencePipeline::new(PipelineConfig::default());
//! let record = FeatureRecord::from_raw(
//!     "male",
//!     "group B",
//!     "bachelor's degree",
//!     "standard",
//!     "completed",
//!     72.0,
//!     74.0,
//! )?;
//! let result = pipeline.predict(&record)?;
//! println!("{} ({:?})", result.label, result.score);
//! # Ok::<(), studentperf::StudentPerfError>(())
//! ```

// Core error handling
pub mod error;

// Request data model
pub mod record;

// Artifact loading and caching
pub mod artifact;

// Training-time feature encoding
pub mod preprocessing;

// Model application and orchestration
pub mod inference;

pub use artifact::{ArtifactKind, ArtifactSource, ArtifactStore, FsSource};
pub use error::{FieldViolation, Result, StudentPerfError};
pub use inference::{InferencePipeline, PipelineConfig, PredictionResult, Predictor, TrainedModel};
pub use preprocessing::{ColumnEncoding, FeatureEncoder, FittedTransform};
pub use record::{
    FeatureRecord, Gender, Lunch, ParentalEducation, RaceEthnicity, TestPreparation,
};
