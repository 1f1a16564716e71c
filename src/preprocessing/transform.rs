//! The fitted preprocessing transform artifact
//!
//! Owns the encoding rules learned once at training time: category
//! vocabularies for one-hot columns and center/scale parameters for numeric
//! columns, in the exact column order the model was trained against.
//! Read-only and shared across all concurrent requests.

use serde::{Deserialize, Serialize};

use crate::artifact::ValidatedArtifact;

/// Declared type tag every transform artifact must carry
pub const TRANSFORM_TAG: &str = "fitted_transform";

/// Artifact schema version this build understands
pub const TRANSFORM_SCHEMA_VERSION: u32 = 1;

/// Encoding rule for one training-time input column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum ColumnEncoding {
    /// One-hot encoded categorical column: one output column per category,
    /// in vocabulary order
    Categorical {
        name: String,
        categories: Vec<String>,
    },
    /// Standard-scaled numeric column: `(x - center) / scale`
    Numeric { name: String, center: f64, scale: f64 },
}

impl ColumnEncoding {
    /// Input column name
    pub fn name(&self) -> &str {
        match self {
            ColumnEncoding::Categorical { name, .. } => name,
            ColumnEncoding::Numeric { name, .. } => name,
        }
    }

    /// Number of output columns this encoding produces
    pub fn output_width(&self) -> usize {
        match self {
            ColumnEncoding::Categorical { categories, .. } => categories.len(),
            ColumnEncoding::Numeric { .. } => 1,
        }
    }
}

/// Serialized form of the fitted transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedTransform {
    /// Declared artifact type, checked at load
    artifact: String,
    /// Schema version, checked at load
    schema_version: u32,
    /// Column encodings in training-time order
    columns: Vec<ColumnEncoding>,
}

impl FittedTransform {
    /// Assemble a transform from column encodings. Used by the training
    /// side when exporting and by tests building fixtures.
    pub fn from_columns(columns: Vec<ColumnEncoding>) -> Self {
        Self {
            artifact: TRANSFORM_TAG.to_string(),
            schema_version: TRANSFORM_SCHEMA_VERSION,
            columns,
        }
    }

    /// Column encodings in training-time order
    pub fn columns(&self) -> &[ColumnEncoding] {
        &self.columns
    }

    /// Total width of the encoded feature vector. Entirely determined by
    /// the transform, never by the request.
    pub fn output_width(&self) -> usize {
        self.columns.iter().map(ColumnEncoding::output_width).sum()
    }
}

impl ValidatedArtifact for FittedTransform {
    fn check(&self) -> Result<(), String> {
        if self.artifact != TRANSFORM_TAG {
            return Err(format!(
                "declared type {:?} is not {:?}",
                self.artifact, TRANSFORM_TAG
            ));
        }
        if self.schema_version != TRANSFORM_SCHEMA_VERSION {
            return Err(format!(
                "schema version {} is not supported (expected {})",
                self.schema_version, TRANSFORM_SCHEMA_VERSION
            ));
        }
        if self.columns.is_empty() {
            return Err("transform has no columns".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name()) {
                return Err(format!("duplicate column {:?}", column.name()));
            }
            match column {
                ColumnEncoding::Categorical { name, categories } => {
                    if categories.is_empty() {
                        return Err(format!("column {name:?} has an empty vocabulary"));
                    }
                    let unique: std::collections::HashSet<&String> =
                        categories.iter().collect();
                    if unique.len() != categories.len() {
                        return Err(format!("column {name:?} has duplicate categories"));
                    }
                }
                ColumnEncoding::Numeric { name, center, scale } => {
                    if !center.is_finite() {
                        return Err(format!("column {name:?} has non-finite center"));
                    }
                    if !scale.is_finite() || *scale == 0.0 {
                        return Err(format!(
                            "column {name:?} has invalid scale {scale}"
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
