use postpress_common::model::image::ImageRef;

pub const IMAGE_CDN: &str = "https://cdn.sanity.io/images";

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    #[must_use]
    pub fn url(&self, image: &ImageRef) -> String {
        format!(
            "{IMAGE_CDN}/{}/{}/{}",
            self.project_id,
            self.dataset,
            image.file_name()
        )
    }
}
