//! MobileNetV2 feature extractor.

use super::{ConvBn2D, ConvBn2DInit};
use crate::common::*;

/// The expansion factor, output channels, repeats and first stride of each stage.
const STAGES: [(usize, usize, usize, usize); 7] = [
    (1, 16, 1, 1),
    (6, 24, 2, 2),
    (6, 32, 3, 2),
    (6, 64, 4, 2),
    (6, 96, 3, 1),
    (6, 160, 3, 2),
    (6, 320, 1, 1),
];
const STEM_CHANNELS: usize = 32;

/// The number of channels of the backbone output.
pub const BACKBONE_CHANNELS: usize = 1280;

/// The ratio of input to output spatial size.
pub const BACKBONE_STRIDE: usize = 32;

#[derive(Debug, Clone)]
pub struct InvertedResidualInit {
    pub in_c: usize,
    pub out_c: usize,
    pub stride: usize,
    pub expand_ratio: usize,
}

impl InvertedResidualInit {
    pub fn build<'p, P>(self, path: P) -> InvertedResidual
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();

        let Self {
            in_c,
            out_c,
            stride,
            expand_ratio,
        } = self;
        let hidden_c = in_c * expand_ratio;

        let expand = (expand_ratio != 1)
            .then(|| ConvBn2DInit::new(in_c, hidden_c, 1).build(path / "expand"));
        let depthwise = ConvBn2DInit {
            s: stride,
            g: hidden_c,
            ..ConvBn2DInit::new(hidden_c, hidden_c, 3)
        }
        .build(path / "depthwise");
        let project = ConvBn2DInit {
            relu6: false,
            ..ConvBn2DInit::new(hidden_c, out_c, 1)
        }
        .build(path / "project");

        InvertedResidual {
            expand,
            depthwise,
            project,
            residual: stride == 1 && in_c == out_c,
        }
    }
}

#[derive(Debug)]
pub struct InvertedResidual {
    expand: Option<ConvBn2D>,
    depthwise: ConvBn2D,
    project: ConvBn2D,
    residual: bool,
}

impl nn::ModuleT for InvertedResidual {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let hidden = match &self.expand {
            Some(expand) => expand.forward_t(xs, train),
            None => xs.shallow_clone(),
        };
        let ys = hidden
            .apply_t(&self.depthwise, train)
            .apply_t(&self.project, train);

        if self.residual {
            ys + xs
        } else {
            ys
        }
    }
}

/// Builds the MobileNetV2 feature extractor without its classification top.
#[derive(Debug, Clone)]
pub struct MobileNetV2Init {
    pub in_c: usize,
}

impl Default for MobileNetV2Init {
    fn default() -> Self {
        Self { in_c: 3 }
    }
}

impl MobileNetV2Init {
    pub fn build<'p, P>(self, path: P) -> MobileNetV2
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self { in_c } = self;

        let stem = ConvBn2DInit {
            s: 2,
            ..ConvBn2DInit::new(in_c, STEM_CHANNELS, 3)
        }
        .build(path / "stem");

        let (blocks, last_c) = STAGES.iter().enumerate().fold(
            (vec![], STEM_CHANNELS),
            |(mut blocks, in_c), (stage_index, &(expand_ratio, out_c, repeat, stride))| {
                (0..repeat).for_each(|repeat_index| {
                    let block = InvertedResidualInit {
                        in_c: if repeat_index == 0 { in_c } else { out_c },
                        out_c,
                        stride: if repeat_index == 0 { stride } else { 1 },
                        expand_ratio,
                    }
                    .build(path / format!("block_{}_{}", stage_index, repeat_index));
                    blocks.push(block);
                });
                (blocks, out_c)
            },
        );

        let head = ConvBn2DInit::new(last_c, BACKBONE_CHANNELS, 1).build(path / "head");

        MobileNetV2 { stem, blocks, head }
    }
}

#[derive(Debug)]
pub struct MobileNetV2 {
    stem: ConvBn2D,
    blocks: Vec<InvertedResidual>,
    head: ConvBn2D,
}

impl nn::ModuleT for MobileNetV2 {
    fn forward_t(&self, xs: &Tensor, train: bool) -> Tensor {
        let xs = xs.apply_t(&self.stem, train);
        let xs = self
            .blocks
            .iter()
            .fold(xs, |xs, block| xs.apply_t(block, train));
        xs.apply_t(&self.head, train)
    }
}

/// Checks a batch of images against the backbone input contract.
pub(crate) fn check_image_batch(xs: &Tensor) -> Result<(i64, i64, i64)> {
    let (batch_size, channels, height, width) = xs.size4()?;
    ensure!(
        channels == 3,
        "expect 3 input channels, but get {}",
        channels
    );
    ensure!(
        height >= BACKBONE_STRIDE as i64 && width >= BACKBONE_STRIDE as i64,
        "input size {}x{} is smaller than the backbone stride {}",
        height,
        width,
        BACKBONE_STRIDE
    );
    Ok((batch_size, height, width))
}
