//! Stratified train/validation/test partitioning.

use crate::{
    common::*,
    dataset::Sample,
    error::{InsufficientDataError, SplitStage},
};
use strum::{AsRefStr, EnumIter};

/// Items that belong to exactly one class.
pub trait Stratum {
    fn stratum(&self) -> &str;
}

impl Stratum for Sample {
    fn stratum(&self) -> &str {
        &self.class
    }
}

/// The name of a persisted split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SplitName {
    Train,
    Val,
    Test,
}

impl Display for SplitName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// The share of samples assigned to each split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Result<Self> {
        ensure!(
            [train, val, test]
                .iter()
                .all(|ratio| ratio.is_finite() && *ratio > 0.0),
            "split ratios must be positive, but get {}/{}/{}",
            train,
            val,
            test
        );
        let sum = train + val + test;
        ensure!(
            abs_diff_eq!(sum, 1.0, epsilon = 1e-6),
            "split ratios must sum to 1, but get {}",
            sum
        );
        Ok(Self { train, val, test })
    }

    /// The validation share within the samples held out from training.
    pub fn val_within_rest(&self) -> f64 {
        self.val / (self.val + self.test)
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.7,
            val: 0.15,
            test: 0.15,
        }
    }
}

impl<'de> Deserialize<'de> for SplitRatios {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        #[derive(Deserialize)]
        struct Raw {
            train: f64,
            val: f64,
            test: f64,
        }

        let Raw { train, val, test } = Raw::deserialize(deserializer)?;
        Self::new(train, val, test).map_err(|err| D::Error::custom(format!("{:?}", err)))
    }
}

/// The three disjoint subsets of a dataset.
#[derive(Debug)]
pub struct Splits<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Splits<T> {
    pub fn get(&self, name: SplitName) -> &[T] {
        match name {
            SplitName::Train => &self.train,
            SplitName::Val => &self.val,
            SplitName::Test => &self.test,
        }
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions items into train, validation and test subsets per class.
///
/// The partition is done in two stages, train versus the rest and then validation versus
/// test within the rest. At each stage every class is divided in proportion to the stage
/// ratio, with the integer rounding remainder given to the classes with the largest
/// fractional quota. The outcome depends only on the input order and the seed.
///
/// Strata are formed from the items themselves, so a class without any item is not an
/// error. It is simply absent from all three subsets.
#[derive(Debug, Clone)]
pub struct StratifiedSplit {
    ratios: SplitRatios,
    seed: u64,
}

impl StratifiedSplit {
    pub fn new(ratios: SplitRatios, seed: u64) -> Self {
        Self { ratios, seed }
    }

    pub fn split<T>(&self, items: Vec<T>) -> Result<Splits<T>>
    where
        T: Stratum,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);

        let (train, rest) =
            stratified_two_way(items, self.ratios.train, SplitStage::Primary, &mut rng)?;
        let (val, test) = stratified_two_way(
            rest,
            self.ratios.val_within_rest(),
            SplitStage::Secondary,
            &mut rng,
        )?;

        Ok(Splits { train, val, test })
    }
}

/// Divides items into two parts where the first takes `fraction` of every class.
fn stratified_two_way<T, R>(
    items: Vec<T>,
    fraction: f64,
    stage: SplitStage,
    rng: &mut R,
) -> Result<(Vec<T>, Vec<T>)>
where
    T: Stratum,
    R: Rng,
{
    let total = items.len();

    // group items by class in order of first appearance
    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for item in items {
        groups
            .entry(item.stratum().to_owned())
            .or_insert_with(Vec::new)
            .push(item);
    }

    if let Some((class, group)) = groups.iter().find(|(_, group)| group.len() < 2) {
        return Err(InsufficientDataError {
            class: class.clone(),
            count: group.len(),
            stage,
        }
        .into());
    }

    let first_total = (fraction * total as f64 + 1e-9).floor() as usize;
    ensure!(
        first_total > 0 && first_total < total,
        "splitting {} samples by ratio {} at the {} split leaves one side empty",
        total,
        fraction,
        stage
    );

    // allocate the first part per class by largest remainder
    let quotas: Vec<f64> = groups
        .values()
        .map(|group| group.len() as f64 * first_total as f64 / total as f64)
        .collect();
    let mut allocation: Vec<usize> = quotas
        .iter()
        .map(|quota| (quota + 1e-9).floor() as usize)
        .collect();
    let remainder = first_total - allocation.iter().sum::<usize>();

    let mut order: Vec<usize> = (0..quotas.len()).collect();
    order.shuffle(rng);
    order.sort_by(|&lhs, &rhs| {
        let lhs_frac = quotas[lhs] - allocation[lhs] as f64;
        let rhs_frac = quotas[rhs] - allocation[rhs] as f64;
        rhs_frac.total_cmp(&lhs_frac)
    });
    order
        .into_iter()
        .take(remainder)
        .for_each(|index| allocation[index] += 1);

    // draw members of each class
    let mut first = Vec::with_capacity(first_total);
    let mut second = Vec::with_capacity(total - first_total);

    for (mut group, count) in groups.into_iter().map(|(_, group)| group).zip(allocation) {
        debug_assert!(count <= group.len());
        group.shuffle(rng);
        let rest = group.split_off(count);
        first.extend(group);
        second.extend(rest);
    }

    first.shuffle(rng);
    second.shuffle(rng);

    Ok((first, second))
}
