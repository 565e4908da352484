//! Additive Gaussian pixel noise.

use crate::common::*;
use std::f64::consts::TAU;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GaussNoiseInit {
    /// The range of the noise variance, measured on the 0 to 255 pixel scale.
    pub var_limit: (R64, R64),
}

impl GaussNoiseInit {
    pub fn build(self) -> Result<GaussNoise> {
        let Self {
            var_limit: (min_var, max_var),
        } = self;
        ensure!(min_var >= 0.0, "the minimum variance must be non-negative");
        ensure!(
            min_var <= max_var,
            "the minimum variance must not exceed the maximum variance"
        );

        Ok(GaussNoise {
            min_var: min_var.raw(),
            max_var: max_var.raw(),
        })
    }
}

impl Default for GaussNoiseInit {
    fn default() -> Self {
        Self {
            var_limit: (r64(10.0), r64(50.0)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GaussNoise {
    min_var: f64,
    max_var: f64,
}

impl GaussNoise {
    pub fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        let var = rng.gen_range(self.min_var..=self.max_var);
        let sigma = var.sqrt() / 255.0;
        add_gaussian_noise(image, sigma, rng)
    }
}

/// Adds zero-mean noise with standard deviation `sigma` and clamps into [0, 1].
///
/// The noise is produced from `rng` by the Box-Muller transform, so the outcome is
/// determined by the generator state.
pub fn add_gaussian_noise<R>(image: &Tensor, sigma: f64, rng: &mut R) -> Result<Tensor>
where
    R: Rng + ?Sized,
{
    ensure!(sigma >= 0.0, "sigma must be non-negative, but get {}", sigma);
    let size = image.size();
    let numel = image.numel();

    let noisy = tch::no_grad(|| {
        let mut uniform = || -> Tensor {
            // (0, 1] keeps the logarithm finite
            let values: Vec<f32> = (0..numel).map(|_| 1.0 - rng.gen::<f32>()).collect();
            Tensor::of_slice(&values)
                .reshape(&size)
                .to_device(image.device())
        };
        let radius = (uniform().log() * -2.0).sqrt();
        let angle = uniform() * TAU;
        let noise = radius * angle.cos() * sigma;

        (image + noise).clamp(0.0, 1.0)
    });

    Ok(noisy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_has_requested_spread() -> Result<()> {
        let image = Tensor::full(&[3, 64, 64], 0.5, FLOAT_CPU);
        let mut rng = StdRng::seed_from_u64(9);
        let noisy = add_gaussian_noise(&image, 0.05, &mut rng)?;

        let residual = &noisy - &image;
        assert_abs_diff_eq!(residual.mean(Kind::Float).double_value(&[]), 0.0, epsilon = 5e-3);
        assert_abs_diff_eq!(residual.std(true).double_value(&[]), 0.05, epsilon = 5e-3);
        Ok(())
    }

    #[test]
    fn same_seed_gives_same_noise() -> Result<()> {
        let noise = GaussNoiseInit::default().build()?;
        let image = Tensor::rand(&[3, 8, 8], FLOAT_CPU);
        let lhs = noise.forward(&image, &mut StdRng::seed_from_u64(3))?;
        let rhs = noise.forward(&image, &mut StdRng::seed_from_u64(3))?;
        assert!(lhs.equal(&rhs));
        assert!(lhs.min().double_value(&[]) >= 0.0);
        assert!(lhs.max().double_value(&[]) <= 1.0);
        Ok(())
    }
}
