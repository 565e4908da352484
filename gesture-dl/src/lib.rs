//! Data preparation and stage models for hand gesture recognition.

mod common;
pub mod control;
pub mod dataset;
pub mod error;
pub mod model;
pub mod processor;
pub mod split;
pub mod utils;

pub use error::*;
