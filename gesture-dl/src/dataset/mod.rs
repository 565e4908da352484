//! Annotation loading and labeled hand samples.

mod annotation;
mod dataset;
mod sample;

pub use annotation::*;
pub use dataset::*;
pub use sample::*;
