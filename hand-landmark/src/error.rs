use crate::NUM_LANDMARKS;
use thiserror::Error;

/// A malformed or incomplete landmark record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("expect exactly {} landmarks, but get {found}", NUM_LANDMARKS)]
    WrongLandmarkCount { found: usize },
    #[error("expect a multiple of 3 coordinate values, but get {len}")]
    MisalignedValues { len: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}
