//! The training-time augmentation chain.

use super::{
    horizontal_flip, Blur, BlurInit, BrightnessContrast, BrightnessContrastInit, Clahe,
    ClaheInit, GaussNoise, GaussNoiseInit, RandomRotate, RandomRotateInit,
};
use crate::{common::*, utils::Probability};

/// Probabilities and limits of every augmentation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationInit {
    #[serde(default = "default_half")]
    pub horizontal_flip_prob: Probability,
    #[serde(default = "default_half")]
    pub rotate_prob: Probability,
    /// The maximum rotation angle in degrees.
    #[serde(default = "default_rotate_degrees")]
    pub rotate_degrees: R64,
    #[serde(default = "default_half")]
    pub brightness_contrast_prob: Probability,
    #[serde(default = "default_jitter_limit")]
    pub brightness_limit: R64,
    #[serde(default = "default_jitter_limit")]
    pub contrast_limit: R64,
    #[serde(default = "default_three_tenths")]
    pub noise_prob: Probability,
    /// The noise variance range on the 0 to 255 pixel scale.
    #[serde(default = "default_noise_var_limit")]
    pub noise_var_limit: (R64, R64),
    #[serde(default = "default_three_tenths")]
    pub blur_prob: Probability,
    #[serde(default = "default_blur_limit")]
    pub blur_limit: usize,
    #[serde(default = "default_three_tenths")]
    pub clahe_prob: Probability,
    #[serde(default = "default_clahe_clip_limit")]
    pub clahe_clip_limit: R64,
    #[serde(default = "default_clahe_tile_grid_size")]
    pub clahe_tile_grid_size: usize,
}

impl AugmentationInit {
    pub fn build(self) -> Result<Augmentation> {
        let Self {
            horizontal_flip_prob,
            rotate_prob,
            rotate_degrees,
            brightness_contrast_prob,
            brightness_limit,
            contrast_limit,
            noise_prob,
            noise_var_limit,
            blur_prob,
            blur_limit,
            clahe_prob,
            clahe_clip_limit,
            clahe_tile_grid_size,
        } = self;

        Ok(Augmentation {
            horizontal_flip_prob,
            rotate_prob,
            rotate: RandomRotateInit {
                max_degrees: rotate_degrees,
            }
            .build()?,
            brightness_contrast_prob,
            brightness_contrast: BrightnessContrastInit {
                brightness_limit,
                contrast_limit,
            }
            .build()?,
            noise_prob,
            noise: GaussNoiseInit {
                var_limit: noise_var_limit,
            }
            .build()?,
            blur_prob,
            blur: BlurInit { blur_limit }.build()?,
            clahe_prob,
            clahe: ClaheInit {
                clip_limit: clahe_clip_limit,
                tile_grid_size: clahe_tile_grid_size,
            }
            .build()?,
        })
    }
}

impl Default for AugmentationInit {
    fn default() -> Self {
        Self {
            horizontal_flip_prob: default_half(),
            rotate_prob: default_half(),
            rotate_degrees: default_rotate_degrees(),
            brightness_contrast_prob: default_half(),
            brightness_limit: default_jitter_limit(),
            contrast_limit: default_jitter_limit(),
            noise_prob: default_three_tenths(),
            noise_var_limit: default_noise_var_limit(),
            blur_prob: default_three_tenths(),
            blur_limit: default_blur_limit(),
            clahe_prob: default_three_tenths(),
            clahe_clip_limit: default_clahe_clip_limit(),
            clahe_tile_grid_size: default_clahe_tile_grid_size(),
        }
    }
}

fn default_half() -> Probability {
    Probability::literal(0.5)
}

fn default_three_tenths() -> Probability {
    Probability::literal(0.3)
}

fn default_rotate_degrees() -> R64 {
    r64(15.0)
}

fn default_jitter_limit() -> R64 {
    r64(0.2)
}

fn default_noise_var_limit() -> (R64, R64) {
    (r64(10.0), r64(50.0))
}

fn default_blur_limit() -> usize {
    3
}

fn default_clahe_clip_limit() -> R64 {
    r64(4.0)
}

fn default_clahe_tile_grid_size() -> usize {
    8
}

/// Applies flip, rotation, brightness/contrast, noise, blur and CLAHE in this order,
/// each one independently with its own probability.
///
/// Only flip and rotation move landmarks. The remaining steps see the image alone.
#[derive(Debug, Clone)]
pub struct Augmentation {
    horizontal_flip_prob: Probability,
    rotate_prob: Probability,
    rotate: RandomRotate,
    brightness_contrast_prob: Probability,
    brightness_contrast: BrightnessContrast,
    noise_prob: Probability,
    noise: GaussNoise,
    blur_prob: Probability,
    blur: Blur,
    clahe_prob: Probability,
    clahe: Clahe,
}

impl Augmentation {
    pub fn forward<R>(
        &self,
        image: &Tensor,
        landmarks: &Landmarks,
        rng: &mut R,
    ) -> Result<(Tensor, Landmarks)>
    where
        R: Rng + ?Sized,
    {
        let (channels, _height, _width) = image.size3()?;
        ensure!(
            channels == 3,
            "channel size must be 3, but get {}",
            channels
        );

        // geometric
        let (image, landmarks) = if self.horizontal_flip_prob.sample(rng) {
            horizontal_flip(image, landmarks)?
        } else {
            (image.shallow_clone(), *landmarks)
        };
        let (image, landmarks) = if self.rotate_prob.sample(rng) {
            self.rotate.forward(&image, &landmarks, rng)?
        } else {
            (image, landmarks)
        };

        // photometric
        let image = if self.brightness_contrast_prob.sample(rng) {
            self.brightness_contrast.forward(&image, rng)?
        } else {
            image
        };
        let image = if self.noise_prob.sample(rng) {
            self.noise.forward(&image, rng)?
        } else {
            image
        };
        let image = if self.blur_prob.sample(rng) {
            self.blur.forward(&image, rng)?
        } else {
            image
        };
        let image = if self.clahe_prob.sample(rng) {
            self.clahe.forward(&image, rng)?
        } else {
            image
        };

        Ok((image, landmarks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_landmarks() -> Landmarks {
        let mut points = [[0f32; 3]; NUM_LANDMARKS];
        points.iter_mut().enumerate().for_each(|(index, point)| {
            let t = index as f32 / NUM_LANDMARKS as f32;
            *point = [0.2 + 0.6 * t, 0.8 - 0.5 * t, -0.05 * t];
        });
        Landmarks::new(points)
    }

    #[test]
    fn photometric_steps_keep_landmarks() -> Result<()> {
        let augmentation = AugmentationInit {
            horizontal_flip_prob: Probability::ZERO,
            rotate_prob: Probability::ZERO,
            brightness_contrast_prob: Probability::ONE,
            noise_prob: Probability::ONE,
            blur_prob: Probability::ONE,
            clahe_prob: Probability::ONE,
            ..Default::default()
        }
        .build()?;
        let mut rng = StdRng::seed_from_u64(21);
        let landmarks = ramp_landmarks();

        for _ in 0..5 {
            let image = Tensor::rand(&[3, 32, 32], FLOAT_CPU);
            let (augmented, new_landmarks) = augmentation.forward(&image, &landmarks, &mut rng)?;
            assert_eq!(augmented.size(), image.size());
            assert_eq!(new_landmarks, landmarks);
        }
        Ok(())
    }

    #[test]
    fn geometric_steps_keep_landmark_order() -> Result<()> {
        let augmentation = AugmentationInit {
            horizontal_flip_prob: Probability::ONE,
            rotate_prob: Probability::ONE,
            brightness_contrast_prob: Probability::ZERO,
            noise_prob: Probability::ZERO,
            blur_prob: Probability::ZERO,
            clahe_prob: Probability::ZERO,
            ..Default::default()
        }
        .build()?;
        let mut rng = StdRng::seed_from_u64(4);
        let landmarks = ramp_landmarks();
        let image = Tensor::rand(&[3, 32, 32], FLOAT_CPU);

        let (augmented, new_landmarks) = augmentation.forward(&image, &landmarks, &mut rng)?;
        assert_eq!(augmented.size(), vec![3, 32, 32]);
        assert_eq!(new_landmarks.points().len(), NUM_LANDMARKS);

        // depth is untouched and the wrist-to-tip ordering along x is mirrored
        for (orig, new) in izip!(landmarks.iter(), new_landmarks.iter()) {
            assert_eq!(orig[2], new[2]);
        }
        let first = new_landmarks[LandmarkIndex::Wrist];
        let last = new_landmarks[LandmarkIndex::PinkyTip];
        assert!(first[0] > last[0]);
        Ok(())
    }

    #[test]
    fn same_seed_gives_same_outcome() -> Result<()> {
        let augmentation = AugmentationInit::default().build()?;
        let image = Tensor::rand(&[3, 16, 16], FLOAT_CPU);
        let landmarks = ramp_landmarks();

        let (lhs_image, lhs) =
            augmentation.forward(&image, &landmarks, &mut StdRng::seed_from_u64(8))?;
        let (rhs_image, rhs) =
            augmentation.forward(&image, &landmarks, &mut StdRng::seed_from_u64(8))?;
        assert!(lhs_image.allclose(&rhs_image, 1e-6, 1e-6, false));
        assert_eq!(lhs, rhs);
        Ok(())
    }

    #[test]
    fn probabilities_are_parsed_and_validated() {
        let init: AugmentationInit = serde_json::from_str(r#"{ "noise_prob": 0.9 }"#).unwrap();
        assert_eq!(init.noise_prob.to_f64(), 0.9);
        assert_eq!(init.rotate_prob.to_f64(), 0.5);
        assert_eq!(init.clahe_tile_grid_size, 8);
        assert!(serde_json::from_str::<AugmentationInit>(r#"{ "blur_prob": 1.2 }"#).is_err());
    }
}
