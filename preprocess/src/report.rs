//! The summary of a preprocessing run.

use crate::common::*;

pub const REPORT_FILE: &str = "report.json";

/// Sample counts per class and per split, and the samples that were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub classes: Vec<String>,
    /// Classes without a readable annotation file.
    pub missing_classes: Vec<String>,
    /// Usable samples per class before splitting.
    pub loaded: IndexMap<String, usize>,
    /// Samples per class in each split.
    pub splits: IndexMap<SplitName, IndexMap<String, usize>>,
    /// Skipped samples per reason.
    pub skipped: IndexMap<SkipReason, usize>,
    pub skipped_samples: Vec<SkippedSample>,
}

impl Report {
    pub fn split_total(&self, name: SplitName) -> usize {
        self.splits
            .get(&name)
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }

    /// Classes that have an annotation file but no usable sample.
    ///
    /// These classes are absent from every split.
    pub fn empty_classes(&self) -> Vec<&str> {
        self.loaded
            .iter()
            .filter(|(class, count)| **count == 0 && !self.missing_classes.contains(*class))
            .map(|(class, _)| class.as_str())
            .collect()
    }

    /// Logs the per-class and per-split counts.
    pub fn log(&self) {
        for (name, counts) in &self.splits {
            let detail = counts
                .iter()
                .map(|(class, count)| format!("{}={}", class, count))
                .join(", ");
            info!("{} split: {} samples ({})", name, self.split_total(*name), detail);
        }

        let num_skipped: usize = self.skipped.values().sum();
        if num_skipped > 0 {
            let detail = self
                .skipped
                .iter()
                .map(|(reason, count)| format!("{:?}={}", reason, count))
                .join(", ");
            warn!("skipped {} samples ({})", num_skipped, detail);
        }
        for class in &self.missing_classes {
            warn!("class '{}' has no annotation file", class);
        }
        for class in self.empty_classes() {
            warn!("class '{}' has no usable sample and is left out of all splits", class);
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)
            .with_context(|| format!("failed to write report '{}'", path.display()))?;
        Ok(())
    }
}

/// Counts labels per class, listing every class even when absent.
pub fn count_labels<'a>(
    classes: impl IntoIterator<Item = &'a String>,
    labels: impl IntoIterator<Item = &'a String>,
) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> =
        classes.into_iter().map(|class| (class.clone(), 0)).collect();
    for label in labels {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_round_trips_through_json() -> Result<()> {
        let classes: Vec<String> = vec!["a".into(), "b".into()];
        let labels: Vec<String> = vec!["b".into(), "b".into()];
        let counts = count_labels(&classes, &labels);
        assert_eq!(counts.get("a"), Some(&0));
        assert_eq!(counts.get("b"), Some(&2));

        let report = Report {
            classes: classes.clone(),
            missing_classes: vec![],
            loaded: counts.clone(),
            splits: [(SplitName::Train, counts)].into_iter().collect(),
            skipped: [(SkipReason::Data, 1)].into_iter().collect(),
            skipped_samples: vec![],
        };
        assert_eq!(report.split_total(SplitName::Train), 2);
        assert_eq!(report.split_total(SplitName::Test), 0);

        let text = serde_json::to_string(&report)?;
        assert!(text.contains("\"train\""));
        assert!(text.contains("\"data\""));
        let parsed: Report = serde_json::from_str(&text)?;
        assert_eq!(parsed, report);
        Ok(())
    }

    #[test]
    fn classes_without_samples_are_listed_as_empty() {
        let classes: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let report = Report {
            classes: classes.clone(),
            missing_classes: vec!["c".into()],
            loaded: [("a".into(), 3), ("b".into(), 0), ("c".into(), 0)]
                .into_iter()
                .collect(),
            splits: IndexMap::new(),
            skipped: IndexMap::new(),
            skipped_samples: vec![],
        };
        assert_eq!(report.empty_classes(), vec!["b"]);
    }
}
