use serde::{
    Deserialize, Deserializer,
    de::{Error, Unexpected},
};
use time::Duration;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Default, Hash)]
pub struct PositiveDuration(Duration);

impl PositiveDuration {
    #[must_use]
    pub fn new(duration: Duration) -> Option<Self> {
        duration.is_positive().then_some(Self(duration))
    }

    #[must_use]
    pub fn new_unchecked(duration: Duration) -> Self {
        Self::new(duration).expect("Duration was not positive.")
    }

    #[must_use]
    pub fn from_secs(seconds: u64) -> Option<Self> {
        i64::try_from(seconds)
            .ok()
            .and_then(|seconds| Self::new(Duration::seconds(seconds)))
    }

    #[must_use]
    pub fn to_std(&self) -> std::time::Duration {
        self.0.unsigned_abs()
    }

    #[must_use]
    pub fn whole_seconds(&self) -> u64 {
        self.0.whole_seconds().unsigned_abs()
    }
}

/// Deserializes from a whole number of seconds.
impl<'de> Deserialize<'de> for PositiveDuration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::from_secs(seconds)
            .ok_or_else(|| Error::invalid_value(Unexpected::Unsigned(seconds), &"positive seconds"))
    }
}
