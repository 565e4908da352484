pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use approx::{abs_diff_eq, assert_abs_diff_eq};
pub use futures::stream::{self, StreamExt as _, TryStreamExt as _};
pub use hand_landmark::{
    normalize_landmarks, Affine2, DataError, ImageShape, LandmarkIndex, Landmarks, Point3,
    NUM_LANDMARKS,
};
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::{izip, Itertools as _};
pub use log::{debug, info, warn};
pub use noisy_float::prelude::*;
pub use par_stream::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    borrow::Borrow,
    collections::HashMap,
    fmt::{self, Debug, Display, Formatter},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
pub use tch::{
    kind::FLOAT_CPU,
    nn::{self, ModuleT as _},
    vision, Device, IndexOp as _, Kind, Tensor,
};
