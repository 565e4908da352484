//! Random rotation around the image center.

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RandomRotateInit {
    /// The rotation angle is drawn uniformly from `[-max_degrees, max_degrees]`.
    pub max_degrees: R64,
}

impl RandomRotateInit {
    pub fn build(self) -> Result<RandomRotate> {
        let Self { max_degrees } = self;
        ensure!(
            (0.0..=180.0).contains(&max_degrees.raw()),
            "max_degrees must be within [0, 180], but get {}",
            max_degrees
        );

        Ok(RandomRotate {
            max_radians: max_degrees.raw().to_radians(),
        })
    }
}

impl Default for RandomRotateInit {
    fn default() -> Self {
        Self {
            max_degrees: r64(15.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomRotate {
    max_radians: f64,
}

impl RandomRotate {
    pub fn forward<R>(
        &self,
        image: &Tensor,
        landmarks: &Landmarks,
        rng: &mut R,
    ) -> Result<(Tensor, Landmarks)>
    where
        R: Rng + ?Sized,
    {
        let radians = rng.gen_range(-self.max_radians..=self.max_radians);
        rotate(image, landmarks, radians)
    }
}

/// Rotates a `[C, H, W]` image and its landmarks around the image center.
///
/// A positive angle turns the content counter-clockwise on screen. Pixels sampled from
/// outside the image are reflected back in. Landmarks may leave the unit range when
/// they are rotated out of the image.
pub fn rotate(image: &Tensor, landmarks: &Landmarks, radians: f64) -> Result<(Tensor, Landmarks)> {
    let (channels, height, width) = image.size3()?;
    let (fh, fw) = (height as f64, width as f64);

    // transform in pixel units
    let transform = Affine2::rotation_about(radians, fw / 2.0, fh / 2.0);
    let inverse = transform
        .try_inverse()
        .ok_or_else(|| format_err!("rotation by {} radians is not invertible", radians))?;

    // grid_sampler maps output to input positions in [-1, 1] units
    let to_unit = Affine2::scaling(2.0 / fw, 2.0 / fh).then(&Affine2::translation(-1.0, -1.0));
    let from_unit = to_unit
        .try_inverse()
        .ok_or_else(|| format_err!("invalid image size {}x{}", height, width))?;
    let theta = from_unit.then(&inverse).then(&to_unit);

    let rotated = tch::no_grad(|| {
        let [[a, b, tx], [c, d, ty]] = theta.to_rows();
        let theta = Tensor::of_slice(&[a, b, tx, c, d, ty].map(|val| val as f32))
            .reshape(&[1, 2, 3])
            .to_device(image.device());
        let grid = Tensor::affine_grid_generator(&theta, &[1, channels, height, width], false);

        image
            .reshape(&[1, channels, height, width])
            .grid_sampler(
                &grid,
                0, // bilinear
                2, // reflection
                false,
            )
            .reshape(&[channels, height, width])
    });
    let landmarks = landmarks.transform_pixels(&transform, height as usize, width as usize);

    Ok((rotated, landmarks))
}
