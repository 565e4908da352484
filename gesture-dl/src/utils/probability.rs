use crate::common::*;

/// A probability value within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[repr(transparent)]
pub struct Probability(f64);

impl Probability {
    pub const ZERO: Probability = Probability(0.0);
    pub const ONE: Probability = Probability(1.0);

    /// Wraps a constant already known to lie within [0, 1].
    pub(crate) const fn literal(value: f64) -> Self {
        Self(value)
    }

    pub fn new(value: f64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&value),
            "probability must be within range [0.0, 1.0], but get {}",
            value
        );
        Ok(Self(value))
    }

    pub fn to_f64(&self) -> f64 {
        self.0
    }

    /// Draws a Bernoulli trial with this probability.
    pub fn sample<R>(&self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        rng.gen_bool(self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Probability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(|err| D::Error::custom(format!("{:?}", err)))
    }
}

impl Display for Probability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Probability::new(-0.01).is_err());
        assert!(Probability::new(1.5).is_err());
        assert!(Probability::new(f64::NAN).is_err());
        assert_eq!(Probability::new(0.3).unwrap().to_f64(), 0.3);
        assert!(serde_json::from_str::<Probability>("2.0").is_err());
    }

    #[test]
    fn extreme_probabilities_are_certain() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..100).all(|_| Probability::ONE.sample(&mut rng)));
        assert!((0..100).all(|_| !Probability::ZERO.sample(&mut rng)));
    }
}
