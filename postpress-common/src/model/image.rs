use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error as _, Unexpected},
};
use std::fmt::Display;
use thiserror::Error;

/// Reference to an image asset, e.g. `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg`.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ImageRef {
    asset_id: String,
    width: u32,
    height: u32,
    format: String,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The image reference is invalid: {0:?}")]
pub struct InvalidImageRefError(String);

impl ImageRef {
    pub fn parse(reference: &str) -> Result<Self, InvalidImageRefError> {
        let invalid = || InvalidImageRefError(reference.to_owned());

        let rest = reference.strip_prefix("image-").ok_or_else(invalid)?;
        let (rest, format) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let (asset_id, dimensions) = rest.rsplit_once('-').ok_or_else(invalid)?;
        let (width, height) = dimensions.split_once('x').ok_or_else(invalid)?;

        let width = width.parse().map_err(|_| invalid())?;
        let height = height.parse().map_err(|_| invalid())?;

        if asset_id.is_empty() || format.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            asset_id: asset_id.to_owned(),
            width,
            height,
            format: format.to_owned(),
        })
    }

    #[must_use]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}x{}.{}",
            self.asset_id, self.width, self.height, self.format
        )
    }
}

impl Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "image-{}-{}x{}-{}",
            self.asset_id, self.width, self.height, self.format
        )
    }
}

impl Serialize for ImageRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        ImageRef::parse(&inner)
            .map_err(|err| D::Error::invalid_value(Unexpected::Str(&err.0), &"ImageRef"))
    }
}
