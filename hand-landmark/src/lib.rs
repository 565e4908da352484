//! Fixed-shape hand landmark types and the geometry applied to them.

mod common;

pub mod error;
pub use error::*;

pub mod index;
pub use index::*;

pub mod landmarks;
pub use landmarks::*;

pub mod normalize;
pub use normalize::*;

pub use transform::*;
mod transform;
