use crate::model::image::ImageRef;
use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
pub struct Author {
    pub name: String,
    pub image: Option<ImageRef>,
}
