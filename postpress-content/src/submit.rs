use postpress_common::model::comment::CommentSubmission;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Could not reach the moderation endpoint: {0}")]
    Request(#[from] reqwest::Error),
    #[error("The moderation endpoint answered with {0}")]
    Status(StatusCode),
}

#[derive(Clone, Debug)]
pub struct CommentSubmitter {
    http: Client,
    endpoint: Url,
}

impl CommentSubmitter {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, SubmitError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn submit(&self, submission: &CommentSubmission) -> Result<(), SubmitError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        debug!(post = %submission.post, %status, "Submitted comment for moderation");

        if status.is_success() {
            Ok(())
        } else {
            Err(SubmitError::Status(status))
        }
    }
}
