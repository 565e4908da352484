//! Contrast limited adaptive histogram equalization on the brightness channel.

use crate::common::*;

const NUM_BINS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClaheInit {
    /// The clip limit is drawn from `[1, clip_limit]`.
    pub clip_limit: R64,
    /// The number of tiles along each image axis.
    pub tile_grid_size: usize,
}

impl ClaheInit {
    pub fn build(self) -> Result<Clahe> {
        let Self {
            clip_limit,
            tile_grid_size,
        } = self;
        ensure!(clip_limit >= 1.0, "clip_limit must be at least 1");
        ensure!(tile_grid_size > 0, "tile_grid_size must be positive");

        Ok(Clahe {
            max_clip_limit: clip_limit.raw(),
            tile_grid_size,
        })
    }
}

impl Default for ClaheInit {
    fn default() -> Self {
        Self {
            clip_limit: r64(4.0),
            tile_grid_size: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Clahe {
    max_clip_limit: f64,
    tile_grid_size: usize,
}

impl Clahe {
    pub fn forward<R>(&self, image: &Tensor, rng: &mut R) -> Result<Tensor>
    where
        R: Rng + ?Sized,
    {
        let clip_limit = rng.gen_range(1.0..=self.max_clip_limit);
        self.equalize(image, clip_limit)
    }

    /// Equalizes the HSV value channel of a `[3, H, W]` image, keeping hue and saturation.
    pub fn equalize(&self, image: &Tensor, clip_limit: f64) -> Result<Tensor> {
        let (channels, height, width) = image.size3()?;
        ensure!(
            channels == 3,
            "channel size must be 3, but get {}",
            channels
        );
        let device = image.device();

        tch::no_grad(|| -> Result<_> {
            let (value, _) = image.max_dim(0, false);
            let levels: Vec<u8> = Vec::<f32>::from(value.flatten(0, -1).to_device(Device::Cpu))
                .into_iter()
                .map(|val| (val * 255.0).round().clamp(0.0, 255.0) as u8)
                .collect();

            let equalized = clahe_u8(
                &levels,
                height as usize,
                width as usize,
                self.tile_grid_size,
                clip_limit,
            );
            let equalized: Vec<f32> = equalized
                .into_iter()
                .map(|level| level as f32 / 255.0)
                .collect();
            let new_value = Tensor::of_slice(&equalized)
                .reshape(&[1, height, width])
                .to_device(device);

            // scaling RGB by the same ratio keeps hue and saturation
            let ratio = new_value / value.unsqueeze(0).clamp_min(1e-6);
            Ok((image * ratio).clamp(0.0, 1.0))
        })
    }
}

/// Runs CLAHE over an 8-bit single channel image in row-major layout.
///
/// Each tile histogram is clipped at `clip_limit` times the average bin count and the
/// clipped excess is spread evenly over all bins. Pixel values are mapped by bilinear
/// interpolation between the lookup tables of the four nearest tiles.
pub fn clahe_u8(
    levels: &[u8],
    height: usize,
    width: usize,
    tile_grid_size: usize,
    clip_limit: f64,
) -> Vec<u8> {
    debug_assert_eq!(levels.len(), height * width);
    if levels.is_empty() {
        return vec![];
    }

    let grid_y = tile_grid_size.clamp(1, height);
    let grid_x = tile_grid_size.clamp(1, width);
    let tile_h = height as f64 / grid_y as f64;
    let tile_w = width as f64 / grid_x as f64;
    let bounds = |index: usize, tile: f64| {
        let begin = (index as f64 * tile).floor() as usize;
        let end = ((index + 1) as f64 * tile).floor() as usize;
        begin..end
    };

    // per-tile lookup tables
    let luts: Vec<[u8; NUM_BINS]> = (0..grid_y)
        .cartesian_product(0..grid_x)
        .map(|(ty, tx)| {
            let rows = bounds(ty, tile_h);
            let cols = bounds(tx, tile_w);
            let area = rows.len() * cols.len();

            let mut hist = [0usize; NUM_BINS];
            for y in rows {
                for &level in &levels[(y * width + cols.start)..(y * width + cols.end)] {
                    hist[level as usize] += 1;
                }
            }

            clip_histogram(&mut hist, clip_limit, area);

            let scale = (NUM_BINS - 1) as f64 / area as f64;
            let mut lut = [0u8; NUM_BINS];
            let mut cdf = 0;
            for (bin, count) in hist.iter().enumerate() {
                cdf += count;
                lut[bin] = (cdf as f64 * scale).round().min(255.0) as u8;
            }
            lut
        })
        .collect();

    // position between neighbor tile centers
    let neighbors = |pos: usize, tile: f64, grid: usize| {
        let coord = (pos as f64 + 0.5) / tile - 0.5;
        let lower = coord.floor().max(0.0) as usize;
        let lower = lower.min(grid - 1);
        let upper = (lower + 1).min(grid - 1);
        let weight = (coord - lower as f64).clamp(0.0, 1.0);
        (lower, upper, weight)
    };

    (0..height)
        .cartesian_product(0..width)
        .map(|(y, x)| {
            let level = levels[y * width + x] as usize;
            let (y0, y1, wy) = neighbors(y, tile_h, grid_y);
            let (x0, x1, wx) = neighbors(x, tile_w, grid_x);
            let lookup = |ty: usize, tx: usize| luts[ty * grid_x + tx][level] as f64;

            let top = lookup(y0, x0) * (1.0 - wx) + lookup(y0, x1) * wx;
            let bottom = lookup(y1, x0) * (1.0 - wx) + lookup(y1, x1) * wx;
            (top * (1.0 - wy) + bottom * wy).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

fn clip_histogram(hist: &mut [usize; NUM_BINS], clip_limit: f64, area: usize) {
    let limit = ((clip_limit * area as f64 / NUM_BINS as f64) as usize).max(1);

    let excess: usize = hist
        .iter_mut()
        .map(|count| {
            let over = count.saturating_sub(limit);
            *count -= over;
            over
        })
        .sum();

    let batch = excess / NUM_BINS;
    let residual = excess % NUM_BINS;
    hist.iter_mut().for_each(|count| *count += batch);

    if residual > 0 {
        let step = (NUM_BINS / residual).max(1);
        hist.iter_mut()
            .step_by(step)
            .take(residual)
            .for_each(|count| *count += 1);
    }
}
