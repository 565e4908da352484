use super::{annotation_file, load_annotations, AnnotationRecord, Sample};
use crate::{common::*, processor::ImageLoader};

/// Why a sample was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The image is missing or cannot be decoded.
    Load,
    /// The landmark record is malformed.
    Data,
    /// The record is labeled with a class outside the class list.
    UnknownClass,
}

/// A record that did not make it into the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSample {
    pub image_path: PathBuf,
    pub class: String,
    pub reason: SkipReason,
    pub message: String,
}

/// The usable samples of all classes in load order.
#[derive(Debug)]
pub struct GestureDataset {
    pub classes: IndexSet<String>,
    pub samples: Vec<Sample>,
    pub skipped: Vec<SkippedSample>,
    /// Classes without a readable annotation file.
    pub missing_classes: Vec<String>,
}

impl GestureDataset {
    /// Loads the annotation file of every class and builds one [Sample] per record.
    ///
    /// Records that fail to load are logged and skipped. A class without a readable
    /// annotation file is logged and skipped as well.
    pub async fn load(
        annotations_dir: impl AsRef<Path>,
        classes: impl IntoIterator<Item = impl Into<String>>,
        loader: ImageLoader,
    ) -> Result<Self> {
        let annotations_dir = annotations_dir.as_ref();
        let classes: IndexSet<String> = classes.into_iter().map(Into::into).collect();
        ensure!(!classes.is_empty(), "the class list must not be empty");

        // load annotation files
        let mut missing_classes = vec![];
        let mut records = vec![];

        for class in &classes {
            let path = annotation_file(annotations_dir, class);
            match load_annotations(&path) {
                Ok(class_records) => {
                    info!("loaded {} records of class '{}'", class_records.len(), class);
                    records.extend(class_records);
                }
                Err(err) => {
                    warn!("skip class '{}': {:#}", class, err);
                    missing_classes.push(class.clone());
                }
            }
        }

        // drop records of unknown classes
        let mut skipped = vec![];
        let records: Vec<AnnotationRecord> = records
            .into_iter()
            .filter(|record| {
                let known = classes.contains(&record.gesture_class);
                if !known {
                    let message = format!("unknown class '{}'", record.gesture_class);
                    warn!("skip '{}': {}", record.image_path.display(), message);
                    skipped.push(SkippedSample {
                        image_path: record.image_path.clone(),
                        class: record.gesture_class.clone(),
                        reason: SkipReason::UnknownClass,
                        message,
                    });
                }
                known
            })
            .collect();

        // load images and landmarks
        let loader = Arc::new(loader);
        let outcomes: Vec<(AnnotationRecord, Result<Sample>)> = stream::iter(records)
            .par_map(None, move |record| {
                let loader = loader.clone();
                move || {
                    let result = Sample::load(&record, &loader);
                    (record, result)
                }
            })
            .collect()
            .await;

        let mut samples = vec![];
        for (record, result) in outcomes {
            match result {
                Ok(sample) => samples.push(sample),
                Err(err) => {
                    let reason = if err.downcast_ref::<DataError>().is_some() {
                        SkipReason::Data
                    } else {
                        SkipReason::Load
                    };
                    let message = format!("{:#}", err);
                    warn!("skip '{}': {}", record.image_path.display(), message);
                    skipped.push(SkippedSample {
                        image_path: record.image_path,
                        class: record.gesture_class,
                        reason,
                        message,
                    });
                }
            }
        }

        info!(
            "loaded {} samples, skipped {} records",
            samples.len(),
            skipped.len()
        );

        Ok(Self {
            classes,
            samples,
            skipped,
            missing_classes,
        })
    }

    /// Counts usable samples per class, in class list order.
    pub fn class_counts(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = self
            .classes
            .iter()
            .map(|class| (class.clone(), 0))
            .collect();
        for sample in &self.samples {
            *counts.entry(sample.class.clone()).or_insert(0) += 1;
        }
        counts
    }
}
