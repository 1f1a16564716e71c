//! The trained model artifact and the predictor that applies it

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::artifact::ValidatedArtifact;
use crate::error::{Result, StudentPerfError};

/// Declared type tag every model artifact must carry
pub const MODEL_TAG: &str = "trained_model";

/// Artifact schema version this build understands
pub const MODEL_SCHEMA_VERSION: u32 = 1;

/// Serialized form of the trained model: a linear scorer over the encoded
/// feature vector, with its label vocabulary.
///
/// Binary form: one coefficient row, two classes, sigmoid at 0.5.
/// Multiclass form: one coefficient row per class, softmax argmax.
/// Read-only and shared across all concurrent requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    /// Declared artifact type, checked at load
    artifact: String,
    /// Schema version, checked at load
    schema_version: u32,
    /// Label vocabulary the model emits. Owned by the artifact; the
    /// serving core never assumes a specific vocabulary.
    classes: Vec<String>,
    /// One row per class (or a single row for binary models)
    coefficients: Vec<Vec<f64>>,
    /// One intercept per coefficient row
    intercepts: Vec<f64>,
}

impl TrainedModel {
    /// Assemble a model from its parameters. Used by the training side
    /// when exporting and by tests building fixtures.
    pub fn from_parts(
        classes: Vec<String>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    ) -> Self {
        Self {
            artifact: MODEL_TAG.to_string(),
            schema_version: MODEL_SCHEMA_VERSION,
            classes,
            coefficients,
            intercepts,
        }
    }

    /// Feature vector width this model expects
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    /// The label vocabulary
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl ValidatedArtifact for TrainedModel {
    fn check(&self) -> std::result::Result<(), String> {
        if self.artifact != MODEL_TAG {
            return Err(format!(
                "declared type {:?} is not {:?}",
                self.artifact, MODEL_TAG
            ));
        }
        if self.schema_version != MODEL_SCHEMA_VERSION {
            return Err(format!(
                "schema version {} is not supported (expected {})",
                self.schema_version, MODEL_SCHEMA_VERSION
            ));
        }
        if self.classes.len() < 2 {
            return Err("model declares fewer than two classes".to_string());
        }
        if self.coefficients.is_empty() {
            return Err("model has no coefficients".to_string());
        }

        let binary = self.coefficients.len() == 1 && self.classes.len() == 2;
        if !binary && self.coefficients.len() != self.classes.len() {
            return Err(format!(
                "{} coefficient rows for {} classes",
                self.coefficients.len(),
                self.classes.len()
            ));
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(format!(
                "{} intercepts for {} coefficient rows",
                self.intercepts.len(),
                self.coefficients.len()
            ));
        }

        let width = self.coefficients[0].len();
        if width == 0 {
            return Err("coefficient rows are empty".to_string());
        }
        for row in &self.coefficients {
            if row.len() != width {
                return Err("coefficient rows have inconsistent widths".to_string());
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err("non-finite coefficient".to_string());
            }
        }
        if self.intercepts.iter().any(|b| !b.is_finite()) {
            return Err("non-finite intercept".to_string());
        }

        Ok(())
    }
}

/// A single prediction: one label from the model's vocabulary plus the
/// winning class probability. Returned verbatim to the presentation
/// layer; any relabeling or rounding happens there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: String,
    pub score: Option<f64>,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Applies a trained model to an encoded feature vector
pub struct Predictor;

impl Predictor {
    /// Score one encoded vector. Pure function of its inputs.
    ///
    /// Fails with [`StudentPerfError::DimensionMismatch`] when the vector
    /// width disagrees with the model; that is artifact version skew
    /// between transform and model, a fatal pairing error.
    pub fn predict(vector: ArrayView1<'_, f64>, model: &TrainedModel) -> Result<PredictionResult> {
        let expected = model.n_features();
        if vector.len() != expected {
            return Err(StudentPerfError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        let raw: Vec<f64> = model
            .coefficients
            .iter()
            .zip(&model.intercepts)
            .map(|(row, intercept)| {
                row.iter()
                    .zip(vector.iter())
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + intercept
            })
            .collect();

        if raw.len() == 1 {
            // Binary model: single logit, classes[1] is the positive class
            let p = sigmoid(raw[0]);
            let (index, score) = if p >= 0.5 { (1, p) } else { (0, 1.0 - p) };
            return Ok(PredictionResult {
                label: model.classes[index].clone(),
                score: Some(score),
            });
        }

        // Multiclass: softmax over per-class scores, ties break to the
        // first class index for determinism
        let max_raw = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = raw.iter().map(|z| (z - max_raw).exp()).collect();
        let total: f64 = exp.iter().sum();

        let mut best = 0;
        for (index, value) in raw.iter().enumerate() {
            if *value > raw[best] {
                best = index;
            }
        }

        Ok(PredictionResult {
            label: model.classes[best].clone(),
            score: Some(exp[best] / total),
        })
    }
}
