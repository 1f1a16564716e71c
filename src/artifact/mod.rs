//! Artifact loading and process-wide caching
//!
//! The serving core consumes two artifacts produced and versioned by the
//! training side: a fitted preprocessing transform and a trained model.
//! Both are opaque, already-validated inputs here; this module only loads,
//! checks schema compatibility, and caches them.

mod source;
mod store;

pub use source::{ArtifactSource, FsSource};
pub use store::{ArtifactStore, ValidatedArtifact};

use serde::{Deserialize, Serialize};

/// Which of the two serving artifacts is being addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// The fitted preprocessing transform
    Transform,
    /// The trained model
    Model,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Transform => f.write_str("transform"),
            ArtifactKind::Model => f.write_str("model"),
        }
    }
}
