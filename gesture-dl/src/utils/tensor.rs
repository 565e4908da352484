use crate::common::*;

/// Image helpers on `[C, H, W]` and `[N, C, H, W]` tensors.
pub trait TensorExt {
    fn is_empty(&self) -> bool;

    /// Resizes a `[C, H, W]` image to exactly the given size, ignoring the aspect ratio.
    fn resize2d_exact(&self, new_height: i64, new_width: i64) -> Result<Tensor>;

    /// Averages every pixel over its `kernel` × `kernel` neighborhood, reflecting at the borders.
    fn box_blur2d(&self, kernel: i64) -> Result<Tensor>;

    /// Moves the channel dimension last.
    fn chw_to_hwc(&self) -> Result<Tensor>;
}

impl TensorExt for Tensor {
    fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    fn resize2d_exact(&self, new_height: i64, new_width: i64) -> Result<Tensor> {
        tch::no_grad(|| match (self.kind(), self.size().as_slice()) {
            (Kind::Uint8, &[_channels, _height, _width]) => {
                let resized = vision::image::resize(self, new_width, new_height)?;
                Ok(resized)
            }
            (Kind::Float, &[_channels, _height, _width]) => {
                let resized = vision::image::resize(
                    &(self * 255.0).to_kind(Kind::Uint8),
                    new_width,
                    new_height,
                )?
                .to_kind(Kind::Float)
                    / 255.0;
                Ok(resized)
            }
            (_, &[_channels, _height, _width]) => bail!("unsupported data kind"),
            _ => bail!("invalid shape: expect three dimensions"),
        })
    }

    fn box_blur2d(&self, kernel: i64) -> Result<Tensor> {
        ensure!(
            kernel > 0 && kernel % 2 == 1,
            "kernel size must be a positive odd number, but get {}",
            kernel
        );
        let (channels, height, width) = self.size3()?;
        let pad = kernel / 2;
        ensure!(
            height > pad && width > pad,
            "image of size {}x{} is too small for a {}x{} kernel",
            height,
            width,
            kernel,
            kernel
        );

        let blurred = tch::no_grad(|| {
            let padded = self
                .reshape(&[1, channels, height, width])
                .reflection_pad2d(&[pad, pad, pad, pad]);
            let sum = (0..kernel)
                .cartesian_product(0..kernel)
                .map(|(dy, dx)| padded.narrow(2, dy, height).narrow(3, dx, width))
                .fold(
                    Tensor::zeros(&[1, channels, height, width], (self.kind(), self.device())),
                    |sum, window| sum + window,
                );
            (sum / (kernel * kernel) as f64).reshape(&[channels, height, width])
        });

        Ok(blurred)
    }

    fn chw_to_hwc(&self) -> Result<Tensor> {
        let permuted = match self.dim() {
            3 => self.permute(&[1, 2, 0]),
            4 => self.permute(&[0, 2, 3, 1]),
            dim => bail!("invalid shape: expect three or four dimensions, but get {}", dim),
        };
        Ok(permuted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_blur_keeps_constant_images() -> Result<()> {
        let image = Tensor::full(&[3, 8, 6], 0.25, FLOAT_CPU);
        let blurred = image.box_blur2d(3)?;
        assert_eq!(blurred.size(), vec![3, 8, 6]);
        let max_diff = (&blurred - &image).abs().max().double_value(&[]);
        assert_abs_diff_eq!(max_diff, 0.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn box_blur_spreads_a_single_spike() -> Result<()> {
        let image = Tensor::zeros(&[1, 5, 5], FLOAT_CPU);
        let _ = image.i((0, 2, 2)).fill_(9.0);
        let blurred = image.box_blur2d(3)?;
        assert_abs_diff_eq!(blurred.double_value(&[0, 1, 1]), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(blurred.double_value(&[0, 2, 2]), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(blurred.double_value(&[0, 0, 0]), 0.0, epsilon = 1e-6);
        assert!(image.box_blur2d(2).is_err());
        Ok(())
    }

    #[test]
    fn resize_and_permute_shapes() -> Result<()> {
        let image = Tensor::rand(&[3, 40, 30], FLOAT_CPU);
        let resized = image.resize2d_exact(16, 24)?;
        assert_eq!(resized.size(), vec![3, 16, 24]);
        assert_eq!(resized.chw_to_hwc()?.size(), vec![16, 24, 3]);
        assert!(Tensor::zeros(&[0, 3, 2, 2], FLOAT_CPU).is_empty());
        Ok(())
    }
}
