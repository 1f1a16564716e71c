//! Inference pipeline: the one entry point the presentation layer calls

use tracing::debug;

use crate::artifact::{ArtifactSource, ArtifactStore};
use crate::error::Result;
use crate::inference::{PipelineConfig, PredictionResult, Predictor};
use crate::preprocessing::FeatureEncoder;
use crate::record::FeatureRecord;

/// Orchestrates artifact resolution, encoding, and prediction for one
/// request.
///
/// Stateless across requests except for the owned artifact cache, which
/// is populated at most once per artifact. `predict` takes `&self`, so
/// one pipeline can be shared across threads and serve fully parallel
/// requests once the artifacts are cached.
pub struct InferencePipeline {
    config: PipelineConfig,
    store: ArtifactStore,
}

impl InferencePipeline {
    /// Create a pipeline reading artifacts from the local filesystem
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            store: ArtifactStore::new(),
        }
    }

    /// Create a pipeline with an injected artifact source
    pub fn with_source(config: PipelineConfig, source: Box<dyn ArtifactSource>) -> Self {
        Self {
            config,
            store: ArtifactStore::with_source(source),
        }
    }

    /// Run one prediction. Each step is a hard gate; there are no partial
    /// results:
    ///
    /// 1. validate the record, reporting every violated field
    /// 2. resolve both artifacts (cached after the first successful load)
    /// 3. encode; unknown categories propagate unchanged
    /// 4. predict; dimension mismatches propagate unchanged
    /// 5. return the result verbatim, no post-processing of the label
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult> {
        record.validate()?;

        let transform = self.store.transform(&self.config.transform_path)?;
        let model = self.store.model(&self.config.model_path)?;

        let vector = FeatureEncoder::encode(record, &transform)?;
        let result = Predictor::predict(vector.view(), &model)?;

        debug!(label = %result.label, score = ?result.score, "prediction served");
        Ok(result)
    }

    /// The artifact store, for cache inspection
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// The active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactKind;
    use crate::error::StudentPerfError;
    use crate::inference::TrainedModel;
    use crate::preprocessing::{ColumnEncoding, FittedTransform};
    use crate::record::{Gender, Lunch, ParentalEducation, RaceEthnicity, TestPreparation};

    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    /// In-memory artifact source for isolated pipeline tests
    struct MemorySource {
        files: HashMap<PathBuf, Vec<u8>>,
    }

    impl ArtifactSource for MemorySource {
        fn read(&self, kind: ArtifactKind, path: &Path) -> Result<Vec<u8>> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| StudentPerfError::ArtifactNotFound {
                    kind,
                    path: path.to_path_buf(),
                })
        }
    }

    fn fixture_transform() -> FittedTransform {
        FittedTransform::from_columns(vec![
            ColumnEncoding::Categorical {
                name: "gender".to_string(),
                categories: vec!["female".to_string(), "male".to_string()],
            },
            ColumnEncoding::Numeric {
                name: "reading_score".to_string(),
                center: 50.0,
                scale: 25.0,
            },
            ColumnEncoding::Numeric {
                name: "writing_score".to_string(),
                center: 50.0,
                scale: 25.0,
            },
        ])
    }

    fn fixture_model(n_features: usize) -> TrainedModel {
        TrainedModel::from_parts(
            vec!["fail".to_string(), "pass".to_string()],
            vec![vec![1.0; n_features]],
            vec![-0.5],
        )
    }

    fn pipeline() -> InferencePipeline {
        let mut files = HashMap::new();
        files.insert(
            PathBuf::from("preprocessor.json"),
            serde_json::to_vec(&fixture_transform()).unwrap(),
        );
        files.insert(
            PathBuf::from("model.json"),
            serde_json::to_vec(&fixture_model(4)).unwrap(),
        );

        let config = PipelineConfig::new()
            .with_transform_path("preprocessor.json")
            .with_model_path("model.json");
        InferencePipeline::with_source(config, Box::new(MemorySource { files }))
    }

    fn record() -> FeatureRecord {
        FeatureRecord::new(
            Gender::Male,
            RaceEthnicity::GroupB,
            ParentalEducation::BachelorsDegree,
            Lunch::Standard,
            TestPreparation::Completed,
            72.0,
            74.0,
        )
    }

    #[test]
    fn test_predict_returns_label_from_model_vocabulary() {
        let result = pipeline().predict(&record()).unwrap();
        assert!(["fail", "pass"].contains(&result.label.as_str()));
        assert!(result.score.is_some());
    }

    #[test]
    fn test_validation_gate_runs_before_artifact_use() {
        let pipeline = pipeline();
        let mut bad = record();
        bad.reading_score = 150.0;

        let err = pipeline.predict(&bad).unwrap_err();
        assert!(matches!(err, StudentPerfError::Validation { .. }));
        // Fail-fast: no artifact was touched for an invalid request
        assert_eq!(pipeline.store().storage_reads(), 0);
    }

    #[test]
    fn test_artifacts_load_once_across_requests() {
        let pipeline = pipeline();
        for _ in 0..5 {
            pipeline.predict(&record()).unwrap();
        }
        assert_eq!(pipeline.store().storage_reads(), 2);
    }

    #[test]
    fn test_mismatched_artifact_pair_is_dimension_error() {
        let mut files = HashMap::new();
        files.insert(
            PathBuf::from("preprocessor.json"),
            serde_json::to_vec(&fixture_transform()).unwrap(),
        );
        // Model trained against a wider layout than the transform produces
        files.insert(
            PathBuf::from("model.json"),
            serde_json::to_vec(&fixture_model(17)).unwrap(),
        );

        let config = PipelineConfig::new()
            .with_transform_path("preprocessor.json")
            .with_model_path("model.json");
        let pipeline =
            InferencePipeline::with_source(config, Box::new(MemorySource { files }));

        let err = pipeline.predict(&record()).unwrap_err();
        assert!(matches!(
            err,
            StudentPerfError::DimensionMismatch {
                expected: 17,
                actual: 4,
            }
        ));
    }

    #[test]
    fn test_missing_model_surfaces_not_found() {
        let mut files = HashMap::new();
        files.insert(
            PathBuf::from("preprocessor.json"),
            serde_json::to_vec(&fixture_transform()).unwrap(),
        );

        let config = PipelineConfig::new()
            .with_transform_path("preprocessor.json")
            .with_model_path("model.json");
        let pipeline =
            InferencePipeline::with_source(config, Box::new(MemorySource { files }));

        let err = pipeline.predict(&record()).unwrap_err();
        assert!(matches!(
            err,
            StudentPerfError::ArtifactNotFound {
                kind: ArtifactKind::Model,
                ..
            }
        ));
    }
}
