use super::AnnotationRecord;
use crate::{common::*, processor::ImageLoader};

/// A labeled hand image together with its landmark record.
#[derive(Debug)]
pub struct Sample {
    pub image_path: PathBuf,
    pub class: String,
    pub landmarks: Landmarks,
    /// The size of the image the landmarks were extracted from.
    pub source_shape: ImageShape,
    /// `[3, H, W]` pixels in [0, 1] at the target resolution.
    pub image: Tensor,
}

impl Sample {
    /// Builds a sample from an annotation entry, loading the referenced image.
    ///
    /// Fails with [DataError] when the record does not hold exactly 21 points and with
    /// [LoadError](crate::LoadError) when the image cannot be read.
    pub fn load(record: &AnnotationRecord, loader: &ImageLoader) -> Result<Self> {
        let AnnotationRecord {
            image_path,
            gesture_class,
            landmarks,
        } = record;

        let source_shape = landmarks.image_shape;
        let landmarks = normalize_landmarks(&landmarks.landmarks, &source_shape)?;
        let image = loader.load(image_path)?;

        Ok(Self {
            image_path: image_path.clone(),
            class: gesture_class.clone(),
            landmarks,
            source_shape,
            image,
        })
    }

    /// Copies the sample as-is, without any augmentation.
    pub fn to_processed(&self) -> ProcessedSample {
        ProcessedSample {
            image: self.image.shallow_clone(),
            landmarks: self.landmarks,
            class: self.class.clone(),
        }
    }
}

/// A sample as it goes into a persisted split, possibly augmented.
///
/// The image stays at the target resolution and the landmarks are expressed in the
/// coordinate frame of this image.
#[derive(Debug)]
pub struct ProcessedSample {
    pub image: Tensor,
    pub landmarks: Landmarks,
    pub class: String,
}
