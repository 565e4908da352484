//! Hand landmark regressor.

use super::{check_image_batch, MobileNetV2, MobileNetV2Init, BACKBONE_CHANNELS};
use crate::common::*;

#[derive(Debug, Clone)]
pub struct LandmarkRegressorInit {
    pub hidden_dims: [usize; 2],
    pub dropout: f64,
}

impl Default for LandmarkRegressorInit {
    fn default() -> Self {
        Self {
            hidden_dims: [512, 256],
            dropout: 0.3,
        }
    }
}

impl LandmarkRegressorInit {
    pub fn build<'p, P>(self, path: P) -> Result<LandmarkRegressor>
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            hidden_dims: [hidden1, hidden2],
            dropout,
        } = self;
        ensure!(
            (0.0..1.0).contains(&dropout),
            "dropout rate must be within [0, 1), but get {}",
            dropout
        );

        let linear = |name: &str, in_dim: usize, out_dim: usize| {
            nn::linear(path / name, in_dim as i64, out_dim as i64, Default::default())
        };

        Ok(LandmarkRegressor {
            backbone: MobileNetV2Init::default().build(path / "backbone"),
            fc1: linear("fc1", BACKBONE_CHANNELS, hidden1),
            fc2: linear("fc2", hidden1, hidden2),
            head: linear("head", hidden2, NUM_LANDMARKS * 3),
            dropout,
        })
    }
}

/// Regresses 21 unconstrained `(x, y, z)` landmarks from an image.
#[derive(Debug)]
pub struct LandmarkRegressor {
    backbone: MobileNetV2,
    fc1: nn::Linear,
    fc2: nn::Linear,
    head: nn::Linear,
    dropout: f64,
}

impl LandmarkRegressor {
    /// Maps `[N, 3, H, W]` images to `[N, 21, 3]` landmarks.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let (batch_size, _height, _width) = check_image_batch(xs)?;
        let dropout = self.dropout;

        let landmarks = xs
            .apply_t(&self.backbone, train)
            .adaptive_avg_pool2d(&[1, 1])
            .flatten(1, -1)
            .apply(&self.fc1)
            .relu()
            .dropout(dropout, train)
            .apply(&self.fc2)
            .relu()
            .dropout(dropout, train)
            .apply(&self.head)
            .reshape(&[batch_size, NUM_LANDMARKS as i64, 3]);

        Ok(landmarks)
    }
}
