//! Backing storage access for serialized artifacts

use std::path::Path;

use crate::artifact::ArtifactKind;
use crate::error::{Result, StudentPerfError};

/// Abstraction over the storage medium that holds serialized artifacts.
///
/// Injectable so tests can construct isolated pipelines with in-memory or
/// fault-injecting sources instead of relying on the real filesystem.
pub trait ArtifactSource: Send + Sync {
    /// Read the raw bytes of the artifact at `path`.
    ///
    /// A path that does not resolve must surface as
    /// [`StudentPerfError::ArtifactNotFound`].
    fn read(&self, kind: ArtifactKind, path: &Path) -> Result<Vec<u8>>;
}

/// Filesystem-backed artifact source. The deployment default: artifacts are
/// local serialized files, no network I/O involved.
#[derive(Debug, Default)]
pub struct FsSource;

impl ArtifactSource for FsSource {
    fn read(&self, kind: ArtifactKind, path: &Path) -> Result<Vec<u8>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StudentPerfError::ArtifactNotFound {
                    kind,
                    path: path.to_path_buf(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_maps_to_not_found() {
        let source = FsSource;
        let err = source
            .read(
                ArtifactKind::Model,
                Path::new("/definitely/not/here/model.json"),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StudentPerfError::ArtifactNotFound {
                kind: ArtifactKind::Model,
                ..
            }
        ));
    }

    #[test]
    fn test_reads_existing_file() {
        let dir = std::env::temp_dir().join("studentperf-test-source");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("artifact.json");
        std::fs::write(&path, b"{}").unwrap();

        let source = FsSource;
        let bytes = source.read(ArtifactKind::Transform, &path).unwrap();
        assert_eq!(bytes, b"{}");
    }
}
