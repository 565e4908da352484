//! Image loading and keypoint-consistent augmentation.

pub mod augmentation;
pub mod blur;
pub mod brightness_contrast;
pub mod clahe;
pub mod gauss_noise;
pub mod horizontal_flip;
pub mod image_loader;
pub mod random_rotate;

pub use augmentation::*;
pub use blur::*;
pub use brightness_contrast::*;
pub use clahe::*;
pub use gauss_noise::*;
pub use horizontal_flip::*;
pub use image_loader::*;
pub use random_rotate::*;
