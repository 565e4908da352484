use anyhow::Result;
use gesture_dl::{
    dataset::{
        annotation_file, discover_classes, load_annotations, save_annotations, AnnotationRecord,
        GestureDataset, LandmarkAnnotation, SkipReason,
    },
    processor::ImageLoader,
    utils::ImageSize,
};
use hand_landmark::{ImageShape, Point3};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tch::{vision, Kind, Tensor};

fn workspace(name: &str) -> Result<PathBuf> {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn points(count: usize, tag: f64) -> Vec<Point3> {
    (0..count)
        .map(|index| Point3 {
            x: index as f64 / 21.0,
            y: 0.5,
            z: tag,
        })
        .collect()
}

fn record(image_path: &str, class: &str, num_points: usize, tag: f64) -> AnnotationRecord {
    AnnotationRecord {
        image_path: image_path.into(),
        gesture_class: class.into(),
        landmarks: LandmarkAnnotation {
            landmarks: points(num_points, tag),
            image_shape: ImageShape {
                height: 48,
                width: 64,
                channels: 3,
            },
        },
    }
}

fn write_image(path: &Path, level: u8) -> Result<()> {
    let image = Tensor::full(&[3, 48, 64], level as i64, (Kind::Uint8, tch::Device::Cpu));
    vision::image::save(&image, path)?;
    Ok(())
}

#[tokio::test]
async fn broken_records_are_skipped() -> Result<()> {
    let dir = workspace("broken_records_are_skipped")?;
    let images_dir = dir.join("images");
    let annotations_dir = dir.join("annotations");
    fs::create_dir_all(&images_dir)?;

    write_image(&images_dir.join("a0.png"), 10)?;
    write_image(&images_dir.join("a1.png"), 20)?;
    write_image(&images_dir.join("b0.png"), 30)?;
    fs::write(images_dir.join("corrupt.png"), b"not an image")?;

    save_annotations(
        annotation_file(&annotations_dir, "open_palm"),
        &[
            record("images/a0.png", "open_palm", 21, 0.0),
            record("images/a1.png", "open_palm", 20, 1.0),
            record("images/missing.png", "open_palm", 21, 2.0),
            record("images/corrupt.png", "open_palm", 21, 3.0),
            record("images/a0.png", "peace_sign", 21, 4.0),
        ],
    )?;
    save_annotations(
        annotation_file(&annotations_dir, "thumbs_up"),
        &[
            record("images/b0.png", "thumbs_up", 21, 5.0),
            record("images/a1.png", "thumbs_up", 22, 6.0),
        ],
    )?;

    assert_eq!(
        discover_classes(&annotations_dir)?,
        vec!["open_palm".to_string(), "thumbs_up".to_string()]
    );

    let loader = ImageLoader::new(&dir, ImageSize::new(32, 40)?, None);
    let dataset = GestureDataset::load(
        &annotations_dir,
        ["open_palm", "thumbs_up", "closed_fist"],
        loader,
    )
    .await?;

    assert_eq!(dataset.missing_classes, vec!["closed_fist".to_string()]);
    assert_eq!(dataset.samples.len(), 2);
    assert_eq!(dataset.samples[0].class, "open_palm");
    assert_eq!(dataset.samples[0].landmarks[0][2], 0.0);
    assert_eq!(dataset.samples[1].class, "thumbs_up");
    assert_eq!(dataset.samples[1].landmarks[0][2], 5.0);
    assert_eq!(dataset.samples[0].image.size(), vec![3, 32, 40]);

    let max = dataset.samples[1].image.max().double_value(&[]);
    assert!((max - 30.0 / 255.0).abs() < 1e-3);

    let reasons = |reason: SkipReason| {
        dataset
            .skipped
            .iter()
            .filter(|skipped| skipped.reason == reason)
            .count()
    };
    assert_eq!(reasons(SkipReason::Data), 2);
    assert_eq!(reasons(SkipReason::Load), 2);
    assert_eq!(reasons(SkipReason::UnknownClass), 1);

    let counts = dataset.class_counts();
    assert_eq!(counts["open_palm"], 1);
    assert_eq!(counts["thumbs_up"], 1);
    assert_eq!(counts["closed_fist"], 0);
    Ok(())
}

#[test]
fn annotation_files_round_trip() -> Result<()> {
    let dir = workspace("annotation_files_round_trip")?;
    let path = annotation_file(&dir, "swipe_left");
    let records = vec![
        record("images/x.png", "swipe_left", 21, 0.25),
        record("images/y.png", "swipe_left", 21, -0.5),
    ];
    save_annotations(&path, &records)?;
    assert_eq!(load_annotations(&path)?, records);

    let text = fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(value[0]["landmarks"]["image_shape"]["width"], 64);
    assert_eq!(value[1]["landmarks"]["landmarks"].as_array().unwrap().len(), 21);

    assert!(load_annotations(dir.join("absent_annotations.json")).is_err());
    Ok(())
}
