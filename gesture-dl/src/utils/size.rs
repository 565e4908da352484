use crate::common::*;

/// An image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageSize {
    pub height: usize,
    pub width: usize,
}

impl ImageSize {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "image height and width must be positive, but get {}x{}",
            height,
            width
        );
        Ok(Self { height, width })
    }

    pub fn square(size: usize) -> Result<Self> {
        Self::new(size, size)
    }

    pub fn hw(&self) -> [i64; 2] {
        [self.height as i64, self.width as i64]
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            height: 256,
            width: 256,
        }
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

impl<'de> Deserialize<'de> for ImageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        struct Raw {
            height: usize,
            width: usize,
        }

        let Raw { height, width } = Raw::deserialize(deserializer)?;
        Self::new(height, width).map_err(|err| D::Error::custom(format!("{:?}", err)))
    }
}
