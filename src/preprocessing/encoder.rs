//! Feature encoder: record -> fixed-width numeric vector
//!
//! Reproduces, bit for bit in structure, the column ordering and encoding
//! scheme used when the transform was fitted. Encoding is pure: the same
//! (record, transform) pair always yields the same vector.

use ndarray::Array1;
use tracing::warn;

use crate::error::{Result, StudentPerfError};
use crate::preprocessing::{ColumnEncoding, FittedTransform};
use crate::record::FeatureRecord;

/// Applies a fitted transform to one feature record
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Encode `record` into the feature layout the transform was fitted
    /// with. Output length and column order come entirely from the
    /// transform.
    ///
    /// Category lookup is strict and total: every valid vocabulary member
    /// maps, anything else fails with
    /// [`StudentPerfError::UnknownCategory`] rather than silently
    /// defaulting.
    pub fn encode(record: &FeatureRecord, transform: &FittedTransform) -> Result<Array1<f64>> {
        let mut vector = Vec::with_capacity(transform.output_width());

        for column in transform.columns() {
            match column {
                ColumnEncoding::Categorical { name, categories } => {
                    let value = record
                        .categorical_value(name)
                        .ok_or_else(|| StudentPerfError::ColumnNotFound(name.clone()))?;

                    let hit = categories.iter().position(|c| c == value);
                    let Some(index) = hit else {
                        // The record parsed against our closed enums but the
                        // transform's vocabulary disagrees: training/serving
                        // drift worth flagging to operators.
                        warn!(
                            field = %name,
                            value = %value,
                            "category absent from fitted vocabulary"
                        );
                        return Err(StudentPerfError::UnknownCategory {
                            field: name.clone(),
                            value: value.to_string(),
                        });
                    };

                    for position in 0..categories.len() {
                        vector.push(if position == index { 1.0 } else { 0.0 });
                    }
                }
                ColumnEncoding::Numeric { name, center, scale } => {
                    let value = record
                        .numeric_value(name)
                        .ok_or_else(|| StudentPerfError::ColumnNotFound(name.clone()))?;
                    vector.push((value - center) / scale);
                }
            }
        }

        Ok(Array1::from_vec(vector))
    }
}
