use crate::{common::*, Affine2, DataError, LandmarkIndex, NUM_LANDMARKS};

/// One keypoint in the format written by the upstream landmark extractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A complete landmark record of exactly 21 `[x, y, z]` points.
///
/// `x` and `y` are fractions of the image width and height. `z` is the depth relative to
/// the wrist and has no fixed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmarks {
    points: [[f32; 3]; NUM_LANDMARKS],
}

impl Landmarks {
    pub fn new(points: [[f32; 3]; NUM_LANDMARKS]) -> Self {
        Self { points }
    }

    pub fn zeros() -> Self {
        Self {
            points: [[0.0; 3]; NUM_LANDMARKS],
        }
    }

    pub fn points(&self) -> &[[f32; 3]; NUM_LANDMARKS] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32; 3]> {
        self.points.iter()
    }

    /// Builds a record from 63 values laid out as `[x0, y0, z0, x1, ...]`.
    pub fn from_flat(values: &[f32]) -> Result<Self, DataError> {
        if values.len() % 3 != 0 {
            return Err(DataError::MisalignedValues { len: values.len() });
        }
        if values.len() != NUM_LANDMARKS * 3 {
            return Err(DataError::WrongLandmarkCount {
                found: values.len() / 3,
            });
        }

        let mut points = [[0.0; 3]; NUM_LANDMARKS];
        points
            .iter_mut()
            .zip(values.chunks_exact(3))
            .for_each(|(point, chunk)| point.copy_from_slice(chunk));
        Ok(Self { points })
    }

    pub fn to_flat(&self) -> Vec<f32> {
        self.points.iter().flatten().copied().collect()
    }

    /// Rewrites the `x`, `y` pair of every point, keeping `z` and the point order.
    pub fn map_xy<F>(&self, mut f: F) -> Self
    where
        F: FnMut(f32, f32) -> (f32, f32),
    {
        let mut points = self.points;
        points.iter_mut().for_each(|point| {
            let (x, y) = f(point[0], point[1]);
            point[0] = x;
            point[1] = y;
        });
        Self { points }
    }

    /// Applies a transform given in pixel coordinates of a `height` × `width` image.
    ///
    /// Points are scaled to pixels, transformed, then divided back into fractions of the
    /// same image size.
    pub fn transform_pixels(&self, transform: &Affine2<f64>, height: usize, width: usize) -> Self {
        let height = height as f64;
        let width = width as f64;

        self.map_xy(|x, y| {
            let [px, py] = transform * [x as f64 * width, y as f64 * height];
            ((px / width) as f32, (py / height) as f32)
        })
    }
}

impl Index<LandmarkIndex> for Landmarks {
    type Output = [f32; 3];

    fn index(&self, index: LandmarkIndex) -> &Self::Output {
        &self.points[index.as_usize()]
    }
}

impl Index<usize> for Landmarks {
    type Output = [f32; 3];

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl IndexMut<usize> for Landmarks {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}
