pub use num_traits::Float;
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::{self, Display, Formatter},
    ops::{Index, IndexMut, Mul},
};
