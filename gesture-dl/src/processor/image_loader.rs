//! Image file loading at a fixed resolution.

use crate::{common::*, error::LoadError, utils::{ImageSize, TensorExt as _}};

/// Loads RGB images, resizes them to a fixed size and scales pixels into [0, 1].
#[derive(Debug, Clone)]
pub struct ImageLoader {
    data_root: PathBuf,
    image_size: ImageSize,
    device: Device,
}

impl ImageLoader {
    /// Build a new image loader.
    ///
    /// * `data_root` - The directory relative image paths are resolved against.
    /// * `image_size` - The outcome image size in pixels.
    /// * `device` - The outcome image device. It defaults to CPU if set to `None`.
    pub fn new(
        data_root: impl AsRef<Path>,
        image_size: ImageSize,
        device: impl Into<Option<Device>>,
    ) -> Self {
        Self {
            data_root: data_root.as_ref().to_owned(),
            image_size,
            device: device.into().unwrap_or(Device::Cpu),
        }
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    pub fn resolve(&self, image_path: impl AsRef<Path>) -> PathBuf {
        self.data_root.join(image_path)
    }

    /// Loads the image as a `[3, H, W]` float tensor.
    pub fn load(&self, image_path: impl AsRef<Path>) -> Result<Tensor> {
        let Self {
            image_size, device, ..
        } = *self;
        let path = self.resolve(image_path);

        if !path.is_file() {
            return Err(LoadError::MissingImage { path }.into());
        }

        tch::no_grad(|| -> Result<_> {
            let image = vision::image::load(&path).map_err(|err| LoadError::UndecodableImage {
                path: path.clone(),
                reason: err.to_string(),
            })?;
            check_rgb(&image, &path)?;

            let [height, width] = image_size.hw();
            let image = image
                // resize on cpu before moving to CUDA due to this issue
                // https://github.com/LaurentMazare/tch-rs/issues/286
                .resize2d_exact(height, width)?
                .to_device(device)
                .to_kind(Kind::Float)
                / 255.0;

            Ok(image.set_requires_grad(false))
        })
    }
}

/// Rejects decoded images that are not `[3, H, W]`.
fn check_rgb(image: &Tensor, path: &Path) -> Result<(), LoadError> {
    let undecodable = |reason: String| LoadError::UndecodableImage {
        path: path.to_owned(),
        reason,
    };

    match image.size().as_slice() {
        &[3, _, _] => Ok(()),
        &[channels, _, _] => Err(undecodable(format!(
            "expect an RGB image, but get {} channels",
            channels
        ))),
        shape => Err(undecodable(format!(
            "expect a [3, H, W] image, but get shape {:?}",
            shape
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_rgb_image_is_undecodable() {
        let path = Path::new("images/gray.png");

        assert!(check_rgb(&Tensor::zeros(&[3, 4, 5], (Kind::Uint8, Device::Cpu)), path).is_ok());

        let err = check_rgb(&Tensor::zeros(&[1, 4, 5], (Kind::Uint8, Device::Cpu)), path)
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::UndecodableImage { path: ref err_path, .. } if err_path == path
        ));

        let err = check_rgb(&Tensor::zeros(&[4, 5], (Kind::Uint8, Device::Cpu)), path)
            .unwrap_err();
        assert!(matches!(err, LoadError::UndecodableImage { .. }));
    }

    #[test]
    fn absent_file_is_missing_image() {
        let loader = ImageLoader::new(
            "/nonexistent-gesture-data",
            ImageSize::square(8).unwrap(),
            Device::Cpu,
        );
        let err = loader.load("images/0.png").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingImage { .. })
        ));
    }
}
