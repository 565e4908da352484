//! Hand region detector.

use super::{check_image_batch, MobileNetV2, MobileNetV2Init, BACKBONE_CHANNELS, BACKBONE_STRIDE};
use crate::common::*;

/// The values predicted per anchor: four box offsets and a confidence logit.
pub const DETECTION_ENTRIES: usize = 5;

#[derive(Debug, Clone)]
pub struct HandDetectorInit {
    /// The number of anchors predicted at every cell of the feature map.
    pub anchors_per_cell: usize,
    pub hidden_c: usize,
}

impl Default for HandDetectorInit {
    fn default() -> Self {
        Self {
            anchors_per_cell: 2016,
            hidden_c: 256,
        }
    }
}

impl HandDetectorInit {
    pub fn build<'p, P>(self, path: P) -> Result<HandDetector>
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            anchors_per_cell,
            hidden_c,
        } = self;
        ensure!(anchors_per_cell > 0, "anchors_per_cell must be positive");
        ensure!(hidden_c > 0, "hidden_c must be positive");

        let conv = |name: &str, in_c: usize, out_c: usize, k: i64| {
            nn::conv2d(
                path / name,
                in_c as i64,
                out_c as i64,
                k,
                nn::ConvConfig {
                    padding: k / 2,
                    ..Default::default()
                },
            )
        };

        Ok(HandDetector {
            backbone: MobileNetV2Init::default().build(path / "backbone"),
            conv1: conv("conv1", BACKBONE_CHANNELS, hidden_c, 3),
            conv2: conv("conv2", hidden_c, hidden_c, 3),
            head: conv(
                "head",
                hidden_c,
                anchors_per_cell * DETECTION_ENTRIES,
                1,
            ),
            anchors_per_cell,
        })
    }
}

/// Predicts raw box offsets and confidences for every anchor of a feature grid.
///
/// Boxes are left undecoded and no suppression is applied.
#[derive(Debug)]
pub struct HandDetector {
    backbone: MobileNetV2,
    conv1: nn::Conv2D,
    conv2: nn::Conv2D,
    head: nn::Conv2D,
    anchors_per_cell: usize,
}

impl HandDetector {
    /// The total anchor count for an input image of the given size.
    pub fn num_anchors(&self, height: usize, width: usize) -> usize {
        let grid = |size: usize| (size + BACKBONE_STRIDE - 1) / BACKBONE_STRIDE;
        grid(height) * grid(width) * self.anchors_per_cell
    }

    /// Maps `[N, 3, H, W]` images to `[N, anchors, 5]` predictions.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let (batch_size, _height, _width) = check_image_batch(xs)?;

        let features = xs
            .apply_t(&self.backbone, train)
            .apply(&self.conv1)
            .relu()
            .apply(&self.conv2)
            .relu()
            .apply(&self.head);

        // [N, A * 5, h, w] -> [N, h * w * A, 5]
        let outputs = features
            .permute(&[0, 2, 3, 1])
            .reshape(&[batch_size, -1, DETECTION_ENTRIES as i64]);

        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_has_one_row_per_anchor() -> Result<()> {
        let vs = nn::VarStore::new(Device::Cpu);
        let detector = HandDetectorInit {
            anchors_per_cell: 3,
            hidden_c: 16,
        }
        .build(&vs.root())?;

        let xs = Tensor::zeros(&[2, 3, 64, 64], FLOAT_CPU);
        let ys = detector.forward_t(&xs, false)?;
        assert_eq!(detector.num_anchors(64, 64), 12);
        assert_eq!(ys.size(), vec![2, 12, 5]);

        assert!(detector
            .forward_t(&Tensor::zeros(&[3, 64, 64], FLOAT_CPU), false)
            .is_err());
        Ok(())
    }
}
