pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use futures::stream::{self, StreamExt as _, TryStreamExt as _};
pub use gesture_dl::{
    dataset::{discover_classes, GestureDataset, ProcessedSample, Sample, SkipReason, SkippedSample},
    processor::{Augmentation, AugmentationInit, ImageLoader},
    split::{SplitName, SplitRatios, Splits, StratifiedSplit},
    utils::{ImageSize, TensorExt as _},
};
pub use hand_landmark::{Landmarks, NUM_LANDMARKS};
pub use indexmap::IndexMap;
pub use itertools::Itertools as _;
pub use log::{info, warn};
pub use par_stream::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
pub use tch::{Device, Kind, Tensor};
