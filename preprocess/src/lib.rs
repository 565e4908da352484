//! The preprocessing program that turns hand gesture annotations into split artifacts.

pub mod artifact;
pub mod common;
pub mod config;
pub mod report;

use crate::{
    artifact::SplitArtifact,
    common::*,
    config::Config,
    report::{count_labels, Report, REPORT_FILE},
};
use strum::IntoEnumIterator as _;

/// The entry of preprocessing program.
///
/// Loads every class, splits the samples, augments the training split and writes one
/// artifact directory per split plus a report into the output directory.
pub async fn start(config: Arc<Config>) -> Result<Report> {
    let Config {
        dataset: dataset_config,
        output: output_config,
        preprocessor: preprocessor_config,
    } = &*config;
    let image_size = preprocessor_config.image_size;
    let seed = preprocessor_config.seed;

    // list classes
    let classes = match &dataset_config.classes {
        Some(classes) => classes.clone(),
        None => discover_classes(&dataset_config.annotations_dir)?,
    };
    ensure!(
        !classes.is_empty(),
        "no gesture class found in '{}'",
        dataset_config.annotations_dir.display()
    );
    info!("gesture classes: {}", classes.join(", "));

    // load dataset
    info!("loading dataset");
    let loader = ImageLoader::new(
        &dataset_config.data_root,
        image_size,
        preprocessor_config.device,
    );
    let dataset = GestureDataset::load(&dataset_config.annotations_dir, classes, loader).await?;
    let loaded = dataset.class_counts();
    let GestureDataset {
        classes,
        samples,
        skipped,
        missing_classes,
    } = dataset;
    ensure!(!samples.is_empty(), "no usable sample is loaded");

    // split
    let Splits { train, val, test } =
        StratifiedSplit::new(preprocessor_config.ratios, seed).split(samples)?;
    info!(
        "split into {} train, {} val and {} test samples",
        train.len(),
        val.len(),
        test.len()
    );

    // augment training samples only
    let train = if preprocessor_config.augment {
        let augmentation = preprocessor_config.augmentation.clone().build()?;
        augment_samples(train, augmentation, seed).await?
    } else {
        train.iter().map(Sample::to_processed).collect()
    };
    let val: Vec<_> = val.iter().map(Sample::to_processed).collect();
    let test: Vec<_> = test.iter().map(Sample::to_processed).collect();

    // persist
    let processed_dir = &output_config.processed_dir;
    tokio::fs::create_dir_all(processed_dir).await?;

    let mut split_counts = IndexMap::new();
    for (name, samples) in SplitName::iter().zip([train, val, test]) {
        let dir = processed_dir.join(name.as_ref());
        let artifact = tokio::task::spawn_blocking(move || -> Result<_> {
            let artifact = SplitArtifact::from_samples(&samples, image_size)?;
            artifact.save(&dir)?;
            Ok(artifact)
        })
        .await??;

        info!("saved {} samples of {} split", artifact.len(), name);
        split_counts.insert(name, count_labels(&classes, &artifact.labels));
    }

    // report
    let mut skipped_counts = IndexMap::new();
    for sample in &skipped {
        *skipped_counts.entry(sample.reason).or_insert(0) += 1;
    }

    let report = Report {
        classes: classes.into_iter().collect(),
        missing_classes,
        loaded,
        splits: split_counts,
        skipped: skipped_counts,
        skipped_samples: skipped,
    };
    report.log();
    report.save(processed_dir.join(REPORT_FILE))?;

    Ok(report)
}

/// Augments samples concurrently, keeping their order.
///
/// The random generator of each sample is derived from the seed and the sample position
/// so the outcome does not depend on scheduling.
async fn augment_samples(
    samples: Vec<Sample>,
    augmentation: Augmentation,
    seed: u64,
) -> Result<Vec<ProcessedSample>> {
    let augmentation = Arc::new(augmentation);

    stream::iter(samples.into_iter().enumerate())
        .par_map(None, move |(index, sample)| {
            let augmentation = augmentation.clone();

            move || -> Result<_> {
                let mut rng = sample_rng(seed, index);
                let (image, landmarks) =
                    augmentation.forward(&sample.image, &sample.landmarks, &mut rng)?;
                Ok(ProcessedSample {
                    image,
                    landmarks,
                    class: sample.class,
                })
            }
        })
        .try_collect()
        .await
}

/// The augmentation random generator of the sample at `index`.
pub fn sample_rng(seed: u64, index: usize) -> StdRng {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&(index as u64).to_le_bytes());
    StdRng::from_seed(bytes)
}
