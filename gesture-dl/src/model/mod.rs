//! The stage models and their composition.

mod backbone;
mod classifier;
mod composed;
mod conv_bn_2d;
mod detector;
mod factory;
mod landmark_regressor;

pub use backbone::*;
pub use classifier::*;
pub use composed::*;
pub use conv_bn_2d::*;
pub use detector::*;
pub use factory::*;
pub use landmark_regressor::*;
