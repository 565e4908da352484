//! Random box blur.

use crate::{common::*, utils::TensorExt as _};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlurInit {
    /// The largest kernel size. Kernel sizes are odd numbers from 3 up to this limit.
    pub blur_limit: usize,
}

impl BlurInit {
    pub fn build(self) -> Result<Blur> {
        let Self { blur_limit } = self;
        ensure!(
            blur_limit >= 3,
            "blur_limit must be at least 3, but get {}",
            blur_limit
        );
        let kernel_sizes: Vec<i64> = (3..=blur_limit as i64).step_by(2).collect();
        Ok(Blur { kernel_sizes })
    }
}

impl Default for BlurInit {
    fn default() -> Self {
        Self { blur_limit: 3 }
    }
}

#[derive(Debug, Clone)]
pub struct Blur {
    kernel_sizes: Vec<i64>,
}

impl Blur {
    pub fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        let kernel = *self
            .kernel_sizes
            .choose(rng)
            .ok_or_else(|| format_err!("no kernel size to choose from"))?;
        image.box_blur2d(kernel)
    }
}
