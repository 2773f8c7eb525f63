use crate::{
    image::ImageUrlBuilder,
    query::{POST_BY_SLUG, POST_SLUGS, SLUG_PARAM},
    record::{PostRecord, PostSlugRecord, RecordError},
};
use postpress_common::model::{
    Id,
    comment::{CommentMarker, CommentSubmission},
    post::{Post, PostSummary},
    slug::Slug,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub type Result<T, E = ContentError> = std::result::Result<T, E>;

pub const DEFAULT_API_VERSION: &str = "2021-10-21";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request to the content API failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("The content API rejected the request ({status}): {description}")]
    Query {
        status: StatusCode,
        description: String,
    },
    #[error("The content API returned an invalid document: {0}")]
    Data(#[from] RecordError),
    #[error("Query parameter could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Content API URL is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Writing to the content repository requires an API token")]
    MissingToken,
    #[error("The content API did not report an id for the created document")]
    MissingCreatedId,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ContentConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub api_host: Option<Url>,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ContentConfig {
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            use_cdn: false,
            api_host: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL for requests. Writes never go through the CDN.
    pub fn base_url(&self, for_write: bool) -> Result<Url, url::ParseError> {
        if let Some(host) = &self.api_host {
            return Ok(host.clone());
        }

        let host = if self.use_cdn && !for_write {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        Url::parse(&format!("https://{}.{host}/", self.project_id))
    }

    #[must_use]
    pub fn image_urls(&self) -> ImageUrlBuilder {
        ImageUrlBuilder::new(&self.project_id, &self.dataset)
    }
}

#[derive(Deserialize)]
struct QueryEnvelope<T> {
    result: T,
}

#[derive(Deserialize)]
struct MutationEnvelope {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Deserialize)]
struct MutationResult {
    id: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    description: Option<String>,
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ContentClient {
    http: Client,
    query_url: Url,
    mutate_url: Url,
    token: Option<String>,
}

impl ContentClient {
    pub fn new(config: &ContentConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;

        let query_url = config.base_url(false)?.join(&format!(
            "v{}/data/query/{}",
            config.api_version, config.dataset
        ))?;
        let mutate_url = config.base_url(true)?.join(&format!(
            "v{}/data/mutate/{}",
            config.api_version, config.dataset
        ))?;

        Ok(Self {
            http,
            query_url,
            mutate_url,
            token: config.token.clone(),
        })
    }

    pub async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let records: Vec<PostSlugRecord> = self.query(POST_SLUGS, &[]).await?;

        let posts = records
            .into_iter()
            .filter_map(|record| match PostSummary::try_from(record) {
                Ok(post) => Some(post),
                Err(error) => {
                    warn!(%error, "Skipping post that cannot be routed");
                    None
                }
            })
            .collect();

        Ok(posts)
    }

    pub async fn fetch_post(&self, slug: &Slug) -> Result<Option<Post>> {
        debug!(%slug, "Fetching post");

        let record: Option<PostRecord> = self
            .query(POST_BY_SLUG, &[(SLUG_PARAM, json!(slug.get()))])
            .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn create_comment(
        &self,
        submission: &CommentSubmission,
    ) -> Result<Id<CommentMarker>> {
        let token = self.token.as_deref().ok_or(ContentError::MissingToken)?;

        let mutations = json!({
            "mutations": [{
                "create": {
                    "_type": "comment",
                    "post": {
                        "_type": "reference",
                        "_ref": submission.post,
                    },
                    "name": submission.name,
                    "email": submission.email,
                    "comment": submission.comment,
                    "approved": false,
                }
            }]
        });

        let request = self
            .http
            .post(self.mutate_url.clone())
            .query(&[("returnIds", "true")])
            .bearer_auth(token)
            .json(&mutations);

        let envelope: MutationEnvelope = send(request).await?;
        let id = envelope
            .results
            .into_iter()
            .next()
            .map(|result| result.id)
            .ok_or(ContentError::MissingCreatedId)?;

        debug!(post = %submission.post, comment = %id, "Created comment");
        Ok(Id::new(id))
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<T> {
        let mut request = self
            .http
            .get(self.query_url.clone())
            .query(&[("query", query)]);
        for (name, value) in params {
            request = request.query(&[(format!("${name}"), serde_json::to_string(value)?)]);
        }

        let envelope: QueryEnvelope<T> = send(request).await?;
        Ok(envelope.result)
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let description = response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(|envelope| envelope.error.description.or(envelope.error.message))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned());

    Err(ContentError::Query {
        status,
        description,
    })
}
