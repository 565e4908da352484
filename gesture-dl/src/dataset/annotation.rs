use crate::{common::*, error::LoadError};

/// The file name suffix of per-class annotation files.
pub const ANNOTATION_SUFFIX: &str = "_annotations.json";

/// The landmark payload of an annotation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkAnnotation {
    /// Raw points as reported by the extractor. The count is checked during normalization.
    pub landmarks: Vec<Point3>,
    pub image_shape: ImageShape,
}

/// One entry of an annotation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Image location relative to the data root.
    pub image_path: PathBuf,
    pub gesture_class: String,
    pub landmarks: LandmarkAnnotation,
}

/// The annotation file of a class inside `dir`.
pub fn annotation_file(dir: impl AsRef<Path>, class: &str) -> PathBuf {
    dir.as_ref().join(format!("{}{}", class, ANNOTATION_SUFFIX))
}

/// Reads an annotation file, a JSON array of [AnnotationRecord]s.
pub fn load_annotations(path: impl AsRef<Path>) -> Result<Vec<AnnotationRecord>> {
    let path = path.as_ref();
    let into_error = |reason: String| LoadError::AnnotationFile {
        path: path.to_owned(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|err| into_error(err.to_string()))?;
    let records = serde_json::from_str(&text).map_err(|err| into_error(err.to_string()))?;
    Ok(records)
}

/// Writes records in the same format [load_annotations] reads.
pub fn save_annotations(path: impl AsRef<Path>, records: &[AnnotationRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let text = serde_json::to_string_pretty(records)?;
    fs::write(path, text)
        .with_context(|| format!("failed to write annotation file '{}'", path.display()))?;
    Ok(())
}

/// Lists the classes that own an annotation file in `dir`, sorted by name.
pub fn discover_classes(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    ensure!(
        dir.is_dir(),
        "annotation directory '{}' does not exist",
        dir.display()
    );

    let pattern = dir.join(format!("*{}", ANNOTATION_SUFFIX));
    let pattern = pattern
        .to_str()
        .ok_or_else(|| format_err!("non-UTF-8 path '{}'", dir.display()))?;

    let classes: Vec<String> = glob::glob(pattern)?
        .map(|entry| -> Result<_> {
            let path = entry?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| format_err!("non-UTF-8 file name '{}'", path.display()))?;
            let class = file_name
                .strip_suffix(ANNOTATION_SUFFIX)
                .ok_or_else(|| format_err!("unexpected file name '{}'", file_name))?;
            Ok(class.to_owned())
        })
        .filter_ok(|class| !class.is_empty())
        .collect::<Result<_>>()?;

    Ok(classes.into_iter().sorted().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(class: &str, num_points: usize) -> AnnotationRecord {
        AnnotationRecord {
            image_path: PathBuf::from(format!("data/raw/{}/0.jpg", class)),
            gesture_class: class.to_owned(),
            landmarks: LandmarkAnnotation {
                landmarks: (0..num_points)
                    .map(|index| Point3 {
                        x: 0.5,
                        y: index as f64 / num_points as f64,
                        z: -0.01,
                    })
                    .collect(),
                image_shape: ImageShape {
                    height: 480,
                    width: 640,
                    channels: 3,
                },
            },
        }
    }

    #[test]
    fn parses_extractor_output() -> Result<()> {
        let text = r#"[{
            "image_path": "data/raw/open_palm/img_0001.jpg",
            "gesture_class": "open_palm",
            "landmarks": {
                "landmarks": [{"x": 0.5, "y": 0.25, "z": -0.03}],
                "image_shape": {"height": 480, "width": 640, "channels": 3}
            }
        }]"#;
        let records: Vec<AnnotationRecord> = serde_json::from_str(text)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].gesture_class, "open_palm");
        assert_eq!(records[0].landmarks.landmarks.len(), 1);
        assert_eq!(records[0].landmarks.image_shape.width, 640);
        Ok(())
    }

    #[test]
    fn save_then_discover_and_load() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("gesture-dl-annotations-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let thumbs_up = vec![record("thumbs_up", 21), record("thumbs_up", 20)];
        save_annotations(annotation_file(&dir, "thumbs_up"), &thumbs_up)?;
        save_annotations(annotation_file(&dir, "closed_fist"), &[record("closed_fist", 21)])?;
        fs::write(dir.join("notes.json"), "[]")?;

        assert_eq!(discover_classes(&dir)?, vec!["closed_fist", "thumbs_up"]);
        assert_eq!(load_annotations(annotation_file(&dir, "thumbs_up"))?, thumbs_up);

        let err = load_annotations(annotation_file(&dir, "swipe_left")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::AnnotationFile { .. })
        ));

        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
