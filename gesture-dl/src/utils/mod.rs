mod probability;
mod size;
mod tensor;

pub use probability::*;
pub use size::*;
pub use tensor::*;
