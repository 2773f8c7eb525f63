use postpress_common::util::PositiveDuration;
use postpress_content::{
    client::{ContentClient, ContentConfig, ContentError, DEFAULT_API_VERSION},
    submit::{CommentSubmitter, SubmitError},
};
use render::post::PostRenderer;
use serde::Deserialize;
use server::{
    ServerState,
    pages::{PageBuilder, PageError},
};
use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod render;
mod server;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Invalid moderation endpoint: {0}")]
    ModerationEndpoint(#[from] url::ParseError),
    #[error("Error creating content client: {0}")]
    Content(#[from] ContentError),
    #[error("Error creating comment submitter: {0}")]
    Submitter(#[from] SubmitError),
    #[error("Error prebuilding pages: {0}")]
    Prebuild(#[from] PageError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    sanity_project_id: String,
    sanity_dataset: String,
    #[serde(default = "default_api_version")]
    sanity_api_version: String,
    #[serde(default)]
    sanity_use_cdn: bool,
    sanity_api_host: Option<Url>,
    sanity_api_token: Option<String>,
    #[serde(default = "default_revalidate")]
    revalidate_seconds: PositiveDuration,
    moderation_endpoint: Option<Url>,
    #[serde(default = "default_site_name")]
    site_name: String,
    #[serde(default = "default_prebuild")]
    prebuild: bool,
    #[serde(default = "default_request_timeout")]
    request_timeout_seconds: PositiveDuration,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_revalidate() -> PositiveDuration {
    PositiveDuration::new_unchecked(time::Duration::minutes(1))
}

fn default_site_name() -> String {
    "Postpress".to_owned()
}

fn default_prebuild() -> bool {
    true
}

fn default_request_timeout() -> PositiveDuration {
    PositiveDuration::new_unchecked(time::Duration::seconds(10))
}

impl Env {
    fn content_config(&self) -> ContentConfig {
        ContentConfig {
            project_id: self.sanity_project_id.clone(),
            dataset: self.sanity_dataset.clone(),
            api_version: self.sanity_api_version.clone(),
            use_cdn: self.sanity_use_cdn,
            api_host: self.sanity_api_host.clone(),
            token: self
                .sanity_api_token
                .clone()
                .filter(|token| !token.is_empty()),
            timeout: self.request_timeout_seconds.to_std(),
        }
    }

    /// Defaults to this server's own comment intake.
    fn moderation_endpoint(&self) -> Result<Url, url::ParseError> {
        if let Some(endpoint) = &self.moderation_endpoint {
            return Ok(endpoint.clone());
        }

        let address = match self.server_address {
            IpAddr::V4(address) if address.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(address) if address.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            address => address,
        };
        let server = SocketAddr::new(address, self.server_port);

        Url::parse(&format!("http://{server}/api/createComment"))
    }
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "postpress_api=debug,\
                postpress_content=debug,\
                postpress_common=debug,\
                tower_http=debug,axum::rejection=trace"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_env() -> Result<Env, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(InitError::from)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "Could not listen for the shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let env = get_env()?;

    let content_config = env.content_config();
    if content_config.token.is_none() {
        warn!("SANITY_API_TOKEN is not set, the comment intake will answer 503");
    }

    let content = Arc::new(ContentClient::new(&content_config)?);
    let renderer = Arc::new(PostRenderer::new(
        env.site_name.clone(),
        content_config.image_urls(),
    ));
    let tracker = TaskTracker::new();
    let pages = PageBuilder::new(
        Arc::clone(&content),
        renderer,
        env.revalidate_seconds,
        tracker.clone(),
    );
    let submitter = CommentSubmitter::new(
        env.moderation_endpoint()?,
        env.request_timeout_seconds.to_std(),
    )?;
    info!(endpoint = %submitter.endpoint(), "Comments are sent for moderation");

    if env.prebuild {
        let count = pages.prebuild().await?;
        info!(count, "Prebuilt post pages");
    } else {
        match pages.static_paths().await {
            Ok(paths) => info!(
                count = paths.len(),
                "Post pages will be generated on first request"
            ),
            Err(error) => warn!(%error, "Could not list posts"),
        }
    }

    let tracing_layer = TraceLayer::new_for_http();
    let app = server::routes()
        .with_state(ServerState {
            content,
            pages,
            submitter,
        })
        .layer(tracing_layer);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitError::TcpServe)?;

    tracker.close();
    tracker.wait().await;

    Ok(())
}
