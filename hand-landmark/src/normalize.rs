use crate::{common::*, DataError, Landmarks, Point3, NUM_LANDMARKS};

/// The size of the image a landmark record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    pub height: usize,
    pub width: usize,
    #[serde(default = "default_channels")]
    pub channels: usize,
}

impl Display for ImageShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

fn default_channels() -> usize {
    3
}

/// Converts the raw points of one hand into a fixed 21×3 record.
///
/// The upstream extractor already reports `x` and `y` as fractions of the image size, so
/// the coordinates are not rescaled by the image shape, and `z` is copied as-is. The only
/// accepted input length is 21; shorter or longer lists are rejected, never padded or
/// truncated.
pub fn normalize_landmarks(
    points: &[Point3],
    _image_shape: &ImageShape,
) -> Result<Landmarks, DataError> {
    if points.len() != NUM_LANDMARKS {
        return Err(DataError::WrongLandmarkCount {
            found: points.len(),
        });
    }

    let mut landmarks = Landmarks::zeros();
    for (index, point) in points.iter().enumerate() {
        let Point3 { x, y, z } = *point;
        let values = [x as f32, y as f32, z as f32];
        if !values.iter().all(|value| value.is_finite()) {
            return Err(DataError::NonFiniteCoordinate { index });
        }
        landmarks[index] = values;
    }

    Ok(landmarks)
}
