//! Preprocessing program configuration format.

use crate::common::*;

/// The main preprocessing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub preprocessor: PreprocessorConfig,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = std::fs::read_to_string(path)?;
        let config = json5::from_str(&text)?;
        Ok(config)
    }
}

/// Dataset options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory holding one `<class>_annotations.json` file per class.
    pub annotations_dir: PathBuf,
    /// The directory that image paths in annotation files are relative to.
    pub data_root: PathBuf,
    /// The gesture classes to load. All classes with an annotation file are loaded if unset.
    #[serde(default)]
    pub classes: Option<Vec<String>>,
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// The directory where split artifacts and the report are written.
    pub processed_dir: PathBuf,
}

/// Data preprocessing options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessorConfig {
    /// The resolution every image is resized to.
    #[serde(default)]
    pub image_size: ImageSize,
    /// If set, augment the training split.
    #[serde(default = "default_augment")]
    pub augment: bool,
    /// The seed of splitting and augmentation.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub ratios: SplitRatios,
    #[serde(default)]
    pub augmentation: AugmentationInit,
    /// The device where images are loaded and augmented.
    #[serde(with = "tch_serde::serde_device", default = "default_device")]
    pub device: Device,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            image_size: Default::default(),
            augment: default_augment(),
            seed: default_seed(),
            ratios: Default::default(),
            augmentation: Default::default(),
            device: default_device(),
        }
    }
}

fn default_augment() -> bool {
    true
}

fn default_seed() -> u64 {
    42
}

fn default_device() -> Device {
    Device::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_takes_defaults() -> Result<()> {
        let config: Config = json5::from_str(
            r#"{
                // paths only
                dataset: { annotations_dir: "annotations", data_root: "." },
                output: { processed_dir: "processed" },
            }"#,
        )?;

        assert_eq!(config.dataset.classes, None);
        let preprocessor = &config.preprocessor;
        assert_eq!(preprocessor.image_size, ImageSize::new(256, 256)?);
        assert!(preprocessor.augment);
        assert_eq!(preprocessor.seed, 42);
        assert_eq!(preprocessor.ratios, SplitRatios::default());
        assert_eq!(preprocessor.augmentation, AugmentationInit::default());
        assert_eq!(preprocessor.device, Device::Cpu);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        let parse = |preprocessor: &str| {
            json5::from_str::<Config>(&format!(
                r#"{{
                    dataset: {{ annotations_dir: "a", data_root: "b" }},
                    output: {{ processed_dir: "c" }},
                    preprocessor: {},
                }}"#,
                preprocessor
            ))
        };

        assert!(parse("{ seed: 7, ratios: { train: 0.8, val: 0.1, test: 0.1 } }").is_ok());
        assert!(parse("{ ratios: { train: 0.8, val: 0.2, test: 0.1 } }").is_err());
        assert!(parse("{ ratios: { train: 1.0, val: 0.0, test: 0.0 } }").is_err());
        assert!(parse("{ augmentation: { rotate_prob: 1.5 } }").is_err());
        assert!(parse("{ image_size: { height: 0, width: 32 } }").is_err());
    }

    #[test]
    fn bundled_config_parses() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("preprocess.json5");
        let config = Config::open(path)?;
        assert_eq!(
            config.dataset.classes.as_deref().map(|classes| classes.len()),
            Some(7)
        );
        Ok(())
    }
}
