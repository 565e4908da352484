//! Construction of stage models by name.

use super::{
    GestureClassifier, GestureClassifierInit, HandDetector, HandDetectorInit, HandGestureModel,
    HandGestureModelInit, LandmarkRegressor, LandmarkRegressorInit,
};
use crate::{common::*, utils::ImageSize};
use strum::{AsRefStr, EnumIter, EnumString};

/// The selectable model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ModelKind {
    Detection,
    Landmark,
    Gesture,
    Full,
}

impl ModelKind {
    pub fn build<'p, P>(self, path: P, num_classes: usize) -> Result<StageModel>
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();

        let model = match self {
            Self::Detection => StageModel::Detection(HandDetectorInit::default().build(path)?),
            Self::Landmark => StageModel::Landmark(LandmarkRegressorInit::default().build(path)?),
            Self::Gesture => {
                StageModel::Gesture(GestureClassifierInit::new(num_classes).build(path)?)
            }
            Self::Full => StageModel::Full(HandGestureModelInit::new(num_classes).build(path)?),
        };
        Ok(model)
    }
}

impl Display for ModelKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A model built by [ModelKind::build].
#[derive(Debug)]
pub enum StageModel {
    Detection(HandDetector),
    Landmark(LandmarkRegressor),
    Gesture(GestureClassifier),
    Full(HandGestureModel),
}

impl StageModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            Self::Detection(_) => ModelKind::Detection,
            Self::Landmark(_) => ModelKind::Landmark,
            Self::Gesture(_) => ModelKind::Gesture,
            Self::Full(_) => ModelKind::Full,
        }
    }

    /// Runs the model on a zero batch of one and reports the output shapes by name.
    ///
    /// Image models are fed `[1, 3, H, W]` and the classifier `[1, 21, 3]`.
    pub fn probe(&self, image_size: ImageSize, device: Device) -> Result<Vec<(String, Vec<i64>)>> {
        let [height, width] = image_size.hw();
        let image = || Tensor::zeros(&[1, 3, height, width], (Kind::Float, device));

        tch::no_grad(|| -> Result<_> {
            let shapes = match self {
                Self::Detection(model) => {
                    vec![("anchors".into(), model.forward_t(&image(), false)?.size())]
                }
                Self::Landmark(model) => {
                    vec![("landmarks".into(), model.forward_t(&image(), false)?.size())]
                }
                Self::Gesture(model) => {
                    let landmarks =
                        Tensor::zeros(&[1, NUM_LANDMARKS as i64, 3], (Kind::Float, device));
                    vec![("gesture".into(), model.forward_t(&landmarks, false)?.size())]
                }
                Self::Full(model) => {
                    let output = model.forward_t(&image(), false)?;
                    vec![
                        ("landmarks".into(), output.landmarks.size()),
                        ("gesture".into(), output.gesture.size()),
                    ]
                }
            };
            Ok(shapes)
        })
    }
}

/// Counts the trainable scalars of a variable store.
pub fn num_parameters(vs: &nn::VarStore) -> usize {
    vs.trainable_variables()
        .iter()
        .map(|tensor| tensor.numel())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator as _;

    #[test]
    fn kinds_parse_from_names() {
        for kind in ModelKind::iter() {
            assert_eq!(kind.to_string().parse::<ModelKind>().unwrap(), kind);
        }
        assert_eq!("full".parse::<ModelKind>().unwrap(), ModelKind::Full);
        assert_eq!(
            "detection".parse::<ModelKind>().unwrap(),
            ModelKind::Detection
        );
        assert!("segmentation".parse::<ModelKind>().is_err());
    }

    #[test]
    fn gesture_model_is_small() -> Result<()> {
        let vs = nn::VarStore::new(Device::Cpu);
        let model = ModelKind::Gesture.build(&vs.root(), 7)?;
        assert_eq!(model.kind(), ModelKind::Gesture);

        // 63*128+128 + 128*64+64 + 64*32+32 + 32*7+7
        assert_eq!(num_parameters(&vs), 18_759);

        let shapes = model.probe(ImageSize::default(), Device::Cpu)?;
        assert_eq!(shapes, vec![("gesture".to_string(), vec![1, 7])]);
        Ok(())
    }

    #[test]
    fn full_model_probe() -> Result<()> {
        let vs = nn::VarStore::new(Device::Cpu);
        let model = ModelKind::Full.build(&vs.root(), 5)?;
        let shapes = model.probe(ImageSize::square(64)?, Device::Cpu)?;
        assert_eq!(
            shapes,
            vec![
                ("landmarks".to_string(), vec![1, 21, 3]),
                ("gesture".to_string(), vec![1, 5]),
            ]
        );
        Ok(())
    }
}
