//! The inference-time chain of landmark regression and gesture classification.

use super::{GestureClassifier, GestureClassifierInit, LandmarkRegressor, LandmarkRegressorInit};
use crate::common::*;

#[derive(Debug, Clone)]
pub struct HandGestureModelInit {
    pub regressor: LandmarkRegressorInit,
    pub classifier: GestureClassifierInit,
}

impl HandGestureModelInit {
    pub fn new(num_classes: usize) -> Self {
        Self {
            regressor: Default::default(),
            classifier: GestureClassifierInit::new(num_classes),
        }
    }

    pub fn build<'p, P>(self, path: P) -> Result<HandGestureModel>
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            regressor,
            classifier,
        } = self;

        Ok(HandGestureModel {
            regressor: regressor.build(path / "landmark")?,
            classifier: classifier.build(path / "gesture")?,
        })
    }
}

/// Outputs of [HandGestureModel].
#[derive(Debug)]
pub struct HandGestureOutput {
    /// `[N, 21, 3]` regressed landmarks.
    pub landmarks: Tensor,
    /// `[N, num_classes]` gesture probabilities.
    pub gesture: Tensor,
}

/// Feeds regressed landmarks straight into the gesture classifier.
///
/// The input image is taken as an already cropped hand. No detector runs in front of
/// the regressor, so a frame with a small or off-center hand is classified as it is.
#[derive(Debug)]
pub struct HandGestureModel {
    regressor: LandmarkRegressor,
    classifier: GestureClassifier,
}

impl HandGestureModel {
    pub fn regressor(&self) -> &LandmarkRegressor {
        &self.regressor
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Result<HandGestureOutput> {
        let landmarks = self.regressor.forward_t(xs, train)?;
        let gesture = self.classifier.forward_t(&landmarks, train)?;
        Ok(HandGestureOutput { landmarks, gesture })
    }
}
