//! Error kinds surfaced by data loading and splitting.

use crate::common::*;
use thiserror::Error;

pub use hand_landmark::DataError;

/// An image or annotation file that cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("image file '{}' does not exist", path.display())]
    MissingImage { path: PathBuf },
    #[error("unable to decode image '{}': {reason}", path.display())]
    UndecodableImage { path: PathBuf, reason: String },
    #[error("unable to read annotation file '{}': {reason}", path.display())]
    AnnotationFile { path: PathBuf, reason: String },
}

/// The split stage at which a class ran out of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStage {
    /// Train versus the held-out rest.
    Primary,
    /// Validation versus test within the held-out rest.
    Secondary,
}

impl Display for SplitStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "train/rest"),
            Self::Secondary => write!(f, "val/test"),
        }
    }
}

/// A class with too few samples to be stratified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("class '{class}' has only {count} sample(s) at the {stage} split, at least 2 are required")]
pub struct InsufficientDataError {
    pub class: String,
    pub count: usize,
    pub stage: SplitStage,
}
