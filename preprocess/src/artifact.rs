//! The persisted form of a split.

use crate::common::*;

pub const IMAGES_FILE: &str = "images.npy";
pub const LANDMARKS_FILE: &str = "landmarks.npy";
pub const LABELS_FILE: &str = "labels.json";

/// Three index-aligned arrays describing the samples of one split.
#[derive(Debug)]
pub struct SplitArtifact {
    /// `[N, H, W, 3]` float pixels in [0, 1].
    pub images: Tensor,
    /// `[N, 21, 3]` landmarks.
    pub landmarks: Tensor,
    pub labels: Vec<String>,
}

impl SplitArtifact {
    /// Stacks processed samples in order. Every image must be `[3, H, W]` at `image_size`.
    pub fn from_samples(samples: &[ProcessedSample], image_size: ImageSize) -> Result<Self> {
        let [height, width] = image_size.hw();
        let num_samples = samples.len() as i64;

        let images = if samples.is_empty() {
            Tensor::zeros(&[0, height, width, 3], (Kind::Float, Device::Cpu))
        } else {
            let images: Vec<Tensor> = samples
                .iter()
                .map(|sample| -> Result<_> {
                    let size = sample.image.size();
                    ensure!(
                        size == [3, height, width],
                        "expect image of shape [3, {}, {}], but get {:?}",
                        height,
                        width,
                        size
                    );
                    Ok(sample.image.to_device(Device::Cpu).to_kind(Kind::Float))
                })
                .collect::<Result<_>>()?;
            Tensor::stack(&images, 0).chw_to_hwc()?.contiguous()
        };

        let landmarks: Vec<f32> = samples
            .iter()
            .flat_map(|sample| sample.landmarks.to_flat())
            .collect();
        let landmarks =
            Tensor::of_slice(&landmarks).reshape(&[num_samples, NUM_LANDMARKS as i64, 3]);

        let labels = samples.iter().map(|sample| sample.class.clone()).collect();

        Ok(Self {
            images,
            landmarks,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The landmark record of the sample at `index`.
    pub fn landmarks_at(&self, index: usize) -> Result<Landmarks> {
        ensure!(
            index < self.len(),
            "index {} is out of bound of {} samples",
            index,
            self.len()
        );
        let values = Vec::<f32>::from(self.landmarks.get(index as i64).contiguous().flatten(0, -1));
        let landmarks = Landmarks::from_flat(&values)?;
        Ok(landmarks)
    }

    /// Writes the arrays into `dir`, creating it if needed.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory '{}'", dir.display()))?;

        self.images.write_npy(dir.join(IMAGES_FILE))?;
        self.landmarks.write_npy(dir.join(LANDMARKS_FILE))?;
        fs::write(dir.join(LABELS_FILE), serde_json::to_string(&self.labels)?)?;

        Ok(())
    }

    /// Reads back the arrays written by [SplitArtifact::save].
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        let images = Tensor::read_npy(dir.join(IMAGES_FILE))?;
        let landmarks = Tensor::read_npy(dir.join(LANDMARKS_FILE))?;
        let labels: Vec<String> = serde_json::from_str(&fs::read_to_string(dir.join(LABELS_FILE))?)?;

        let num_samples = labels.len() as i64;
        let (num_images, _height, _width, channels) = images.size4()?;
        ensure!(
            num_images == num_samples && channels == 3,
            "images of shape {:?} do not match {} labels",
            images.size(),
            num_samples
        );
        ensure!(
            landmarks.size() == [num_samples, NUM_LANDMARKS as i64, 3],
            "landmarks of shape {:?} do not match {} labels",
            landmarks.size(),
            num_samples
        );

        Ok(Self {
            images,
            landmarks,
            labels,
        })
    }
}
