//! Load-once artifact cache with single-flight initialization

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::artifact::{ArtifactKind, ArtifactSource, FsSource};
use crate::error::{Result, StudentPerfError};
use crate::inference::TrainedModel;
use crate::preprocessing::FittedTransform;

/// One cache shard: path -> lazily populated slot.
///
/// Each slot carries its own lock so concurrent first loaders of the same
/// path serialize on that slot (single-flight) while loads of different
/// paths proceed in parallel. A failed load leaves the slot empty, so a
/// later request retries instead of seeing a poisoned entry.
struct CacheShard<T> {
    slots: Mutex<HashMap<PathBuf, Arc<Mutex<Option<Arc<T>>>>>>,
}

impl<T> CacheShard<T> {
    fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_load(
        &self,
        path: &Path,
        load: impl FnOnce() -> Result<T>,
    ) -> Result<Arc<T>> {
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(path.to_path_buf()).or_default().clone()
        };

        let mut guard = slot.lock();
        if let Some(cached) = guard.as_ref() {
            return Ok(Arc::clone(cached));
        }

        let loaded = Arc::new(load()?);
        *guard = Some(Arc::clone(&loaded));
        Ok(loaded)
    }

    fn contains(&self, path: &Path) -> bool {
        let slots = self.slots.lock();
        slots
            .get(path)
            .is_some_and(|slot| slot.lock().is_some())
    }
}

/// Loads and caches the fitted transform and trained model artifacts.
///
/// Successful loads are cached per `(kind, path)` for the life of the
/// process; entries are never mutated or evicted after first success
/// (load-once, reuse-many). The artifact set is fixed and small, so no
/// eviction policy is needed.
pub struct ArtifactStore {
    source: Box<dyn ArtifactSource>,
    transforms: CacheShard<FittedTransform>,
    models: CacheShard<TrainedModel>,
    storage_reads: AtomicU64,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("storage_reads", &self.storage_reads.load(Ordering::Relaxed))
            .finish()
    }
}

impl ArtifactStore {
    /// Create a store backed by the local filesystem
    pub fn new() -> Self {
        Self::with_source(Box::new(FsSource))
    }

    /// Create a store with an injected storage backend
    pub fn with_source(source: Box<dyn ArtifactSource>) -> Self {
        Self {
            source,
            transforms: CacheShard::new(),
            models: CacheShard::new(),
            storage_reads: AtomicU64::new(0),
        }
    }

    /// Load the fitted preprocessing transform at `path`, or return the
    /// cached copy from an earlier successful load.
    pub fn transform(&self, path: &Path) -> Result<Arc<FittedTransform>> {
        self.transforms.get_or_load(path, || {
            self.fetch::<FittedTransform>(ArtifactKind::Transform, path)
        })
    }

    /// Load the trained model at `path`, or return the cached copy.
    pub fn model(&self, path: &Path) -> Result<Arc<TrainedModel>> {
        self.models
            .get_or_load(path, || self.fetch::<TrainedModel>(ArtifactKind::Model, path))
    }

    /// Number of reads issued to backing storage. Stays flat once both
    /// artifacts are cached; useful as a load-count probe in tests.
    pub fn storage_reads(&self) -> u64 {
        self.storage_reads.load(Ordering::Relaxed)
    }

    /// Whether a successful load for this key is already cached
    pub fn is_cached(&self, kind: ArtifactKind, path: &Path) -> bool {
        match kind {
            ArtifactKind::Transform => self.transforms.contains(path),
            ArtifactKind::Model => self.models.contains(path),
        }
    }

    /// Read and decode one artifact from backing storage
    fn fetch<T: DeserializeOwned + ValidatedArtifact>(
        &self,
        kind: ArtifactKind,
        path: &Path,
    ) -> Result<T> {
        debug!(%kind, path = %path.display(), "loading artifact from storage");
        self.storage_reads.fetch_add(1, Ordering::Relaxed);

        let bytes = self.source.read(kind, path)?;

        let artifact: T =
            serde_json::from_slice(&bytes).map_err(|err| StudentPerfError::ArtifactCorrupt {
                kind,
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        artifact
            .check()
            .map_err(|reason| StudentPerfError::ArtifactCorrupt {
                kind,
                path: path.to_path_buf(),
                reason,
            })?;

        info!(%kind, path = %path.display(), "artifact loaded");
        Ok(artifact)
    }
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema self-check run after deserialization, before an artifact enters
/// the cache. Returns a human-readable reason on failure.
pub trait ValidatedArtifact {
    fn check(&self) -> std::result::Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::ColumnEncoding;

    use std::sync::atomic::AtomicBool;

    fn transform_json() -> Vec<u8> {
        serde_json::to_vec(&FittedTransform::from_columns(vec![
            ColumnEncoding::Categorical {
                name: "gender".to_string(),
                categories: vec!["female".to_string(), "male".to_string()],
            },
            ColumnEncoding::Numeric {
                name: "reading_score".to_string(),
                center: 69.0,
                scale: 14.6,
            },
        ]))
        .unwrap()
    }

    /// In-memory source that can be told to fail its next read
    struct FlakySource {
        bytes: Vec<u8>,
        fail_next: AtomicBool,
    }

    impl ArtifactSource for FlakySource {
        fn read(&self, kind: ArtifactKind, path: &Path) -> Result<Vec<u8>> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(StudentPerfError::ArtifactNotFound {
                    kind,
                    path: path.to_path_buf(),
                });
            }
            Ok(self.bytes.clone())
        }
    }

    #[test]
    fn test_second_load_hits_cache() {
        let store = ArtifactStore::with_source(Box::new(FlakySource {
            bytes: transform_json(),
            fail_next: AtomicBool::new(false),
        }));
        let path = Path::new("preprocessor.json");

        let first = store.transform(path).unwrap();
        let second = store.transform(path).unwrap();

        assert_eq!(store.storage_reads(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(store.is_cached(ArtifactKind::Transform, path));
    }

    #[test]
    fn test_failed_load_does_not_poison_cache() {
        let store = ArtifactStore::with_source(Box::new(FlakySource {
            bytes: transform_json(),
            fail_next: AtomicBool::new(true),
        }));
        let path = Path::new("preprocessor.json");

        assert!(matches!(
            store.transform(path),
            Err(StudentPerfError::ArtifactNotFound { .. })
        ));
        assert!(!store.is_cached(ArtifactKind::Transform, path));

        // Next request retries and succeeds
        assert!(store.transform(path).is_ok());
        assert_eq!(store.storage_reads(), 2);
    }

    #[test]
    fn test_garbage_bytes_classified_as_corrupt() {
        struct Garbage;
        impl ArtifactSource for Garbage {
            fn read(&self, _kind: ArtifactKind, _path: &Path) -> Result<Vec<u8>> {
                Ok(b"not json at all".to_vec())
            }
        }

        let store = ArtifactStore::with_source(Box::new(Garbage));
        let err = store.transform(Path::new("preprocessor.json")).unwrap_err();
        assert!(matches!(
            err,
            StudentPerfError::ArtifactCorrupt {
                kind: ArtifactKind::Transform,
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_kind_classified_as_corrupt() {
        // A valid transform payload requested as a model must not pass
        struct TransformBytes;
        impl ArtifactSource for TransformBytes {
            fn read(&self, _kind: ArtifactKind, _path: &Path) -> Result<Vec<u8>> {
                Ok(serde_json::to_vec(&FittedTransform::from_columns(vec![
                    ColumnEncoding::Numeric {
                        name: "reading_score".to_string(),
                        center: 0.0,
                        scale: 1.0,
                    },
                ]))
                .unwrap())
            }
        }

        let store = ArtifactStore::with_source(Box::new(TransformBytes));
        let err = store.model(Path::new("model.json")).unwrap_err();
        assert!(matches!(
            err,
            StudentPerfError::ArtifactCorrupt {
                kind: ArtifactKind::Model,
                ..
            }
        ));
    }
}
