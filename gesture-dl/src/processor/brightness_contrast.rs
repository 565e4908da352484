//! Random brightness and contrast adjustment.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrightnessContrastInit {
    /// The brightness offset is drawn from `[-brightness_limit, brightness_limit]`.
    pub brightness_limit: R64,
    /// The contrast gain is drawn from `1 + [-contrast_limit, contrast_limit]`.
    pub contrast_limit: R64,
}

impl BrightnessContrastInit {
    pub fn build(self) -> Result<BrightnessContrast> {
        let Self {
            brightness_limit,
            contrast_limit,
        } = self;
        ensure!(
            brightness_limit >= 0.0,
            "brightness_limit must be non-negative"
        );
        ensure!(
            (0.0..=1.0).contains(&contrast_limit.raw()),
            "contrast_limit must be within [0, 1]"
        );

        Ok(BrightnessContrast {
            brightness_limit: brightness_limit.raw(),
            contrast_limit: contrast_limit.raw(),
        })
    }
}

impl Default for BrightnessContrastInit {
    fn default() -> Self {
        Self {
            brightness_limit: r64(0.2),
            contrast_limit: r64(0.2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BrightnessContrast {
    brightness_limit: f64,
    contrast_limit: f64,
}

impl BrightnessContrast {
    pub fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        let gain = 1.0 + rng.gen_range(-self.contrast_limit..=self.contrast_limit);
        let offset = rng.gen_range(-self.brightness_limit..=self.brightness_limit);
        adjust_brightness_contrast(image, gain, offset)
    }
}

/// Computes `gain * pixel + offset` and clamps the outcome into [0, 1].
pub fn adjust_brightness_contrast(image: &Tensor, gain: f64, offset: f64) -> Result<Tensor> {
    let (_channels, _height, _width) = image.size3()?;
    let adjusted = tch::no_grad(|| (image * gain + offset).clamp(0.0, 1.0));
    Ok(adjusted)
}
