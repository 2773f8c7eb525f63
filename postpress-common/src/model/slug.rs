use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::Display;
use thiserror::Error;

pub const SLUG_MAX_LEN: usize = 96;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The slug is invalid: {0:?}")]
pub struct InvalidSlugError(String);

impl Slug {
    pub fn new(slug: String) -> Result<Self, InvalidSlugError> {
        let valid = !slug.is_empty()
            && slug.chars().count() <= SLUG_MAX_LEN
            && !slug
                .chars()
                .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace() || c.is_control());

        if valid {
            Ok(Slug(slug))
        } else {
            Err(InvalidSlugError(slug))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<String> for Slug {
    type Error = InvalidSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        Slug::new(inner).map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"Slug"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::slug::{SLUG_MAX_LEN, Slug};

    #[test]
    fn accepts_route_safe_slugs() {
        for slug in ["my-first-post", "a", "rust_2024", "émile-zola"] {
            assert_eq!(Slug::new(slug.to_owned()).unwrap().get(), slug);
        }
        assert!(Slug::new("x".repeat(SLUG_MAX_LEN)).is_ok());
    }

    #[test]
    fn rejects_slugs_that_cannot_be_routed() {
        for slug in ["", "a/b", "what?", "with space", "tab\there", "line\nbreak"] {
            assert!(Slug::new(slug.to_owned()).is_err(), "{slug:?} was accepted");
        }
        assert!(Slug::new("x".repeat(SLUG_MAX_LEN + 1)).is_err());
    }

    #[test]
    fn deserialize_validates() {
        let slug: Slug = serde_json::from_str("\"hello-world\"").unwrap();
        assert_eq!(slug.get(), "hello-world");

        assert!(serde_json::from_str::<Slug>("\"\"").is_err());
    }
}
