//! Training-time feature encoding
//!
//! The single most common silent failure in this class of system is a
//! feature-encoding mismatch between training and serving. This module
//! keeps the two in lockstep by making the fitted transform the only
//! authority on column order, vocabularies, and scaling parameters.

mod encoder;
mod transform;

pub use encoder::FeatureEncoder;
pub use transform::{
    ColumnEncoding, FittedTransform, TRANSFORM_SCHEMA_VERSION, TRANSFORM_TAG,
};
