pub mod author;
pub mod body;
pub mod comment;
pub mod image;
pub mod post;
pub mod slug;

use crate::model::{image::InvalidImageRefError, slug::InvalidSlugError};
use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    Slug(#[from] InvalidSlugError),
    #[error(transparent)]
    ImageRef(#[from] InvalidImageRefError),
}

#[derive_where(
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Debug,
    Default,
    Hash,
    Serialize,
    Deserialize
)]
#[serde(transparent)]
pub struct Id<Marker>(String, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into(), PhantomData)
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<String> for Id<Marker> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<&str> for Id<Marker> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Id, post::PostMarker};

    #[test]
    fn id_is_transparent_in_json() {
        let id: Id<PostMarker> = "a1b2c3".into();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"a1b2c3\"");

        let parsed: Id<PostMarker> = serde_json::from_str("\"a1b2c3\"").unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.to_string(), "a1b2c3");
    }
}
