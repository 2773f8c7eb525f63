use crate::render::post::{PostRenderer, post_path};
use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use maud::Markup;
use moka::future::Cache;
use postpress_common::{
    model::{comment::SubmissionState, post::Post, slug::Slug},
    util::PositiveDuration,
};
use postpress_content::client::{ContentClient, ContentError};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

const PAGE_CACHE_CAPACITY: u64 = 10_000;
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("No post has the slug {0}")]
    NotFound(Slug),
    #[error("Page could not be generated: {0}")]
    Content(#[from] ContentError),
}

#[derive(Debug)]
pub struct Page {
    pub post: Post,
    pub html: String,
    built_at: Instant,
}

impl Page {
    pub fn is_stale(&self, interval: PositiveDuration) -> bool {
        self.built_at.elapsed() >= interval.to_std()
    }
}

#[derive(Clone, Debug)]
pub struct PageBuilder {
    content: Arc<ContentClient>,
    renderer: Arc<PostRenderer>,
    cache: Cache<Slug, Arc<Page>>,
    regenerating: Arc<Mutex<HashSet<Slug>>>,
    tracker: TaskTracker,
    revalidate: PositiveDuration,
}

impl PageBuilder {
    pub fn new(
        content: Arc<ContentClient>,
        renderer: Arc<PostRenderer>,
        revalidate: PositiveDuration,
        tracker: TaskTracker,
    ) -> Self {
        let cache = Cache::builder().max_capacity(PAGE_CACHE_CAPACITY).build();

        Self {
            content,
            renderer,
            cache,
            regenerating: Arc::default(),
            tracker,
            revalidate,
        }
    }

    pub fn render(&self, post: &Post, state: &SubmissionState) -> Markup {
        self.renderer.render(post, state)
    }

    pub async fn page(&self, slug: &Slug) -> Result<Arc<Page>, Arc<PageError>> {
        if let Some(page) = self.cache.get(slug).await {
            if page.is_stale(self.revalidate) {
                self.regenerate(slug.clone());
            }
            return Ok(page);
        }

        debug!(%slug, "Page not generated yet, generating before responding");
        self.cache.try_get_with(slug.clone(), self.build(slug)).await
    }

    pub async fn static_paths(&self) -> Result<Vec<String>, ContentError> {
        let posts = self.content.list_posts().await?;
        Ok(posts.iter().map(|post| post_path(&post.slug)).collect())
    }

    pub async fn prebuild(&self) -> Result<usize, PageError> {
        let posts = self.content.list_posts().await?;

        for post in &posts {
            let page = self.build(&post.slug).await?;
            self.cache.insert(post.slug.clone(), page).await;
            debug!(path = post_path(&post.slug), "Prebuilt page");
        }

        Ok(posts.len())
    }

    pub fn response(&self, page: &Page) -> Response {
        let cache_control = format!(
            "public, s-maxage={}, stale-while-revalidate",
            self.revalidate.whole_seconds()
        );

        (
            [
                (header::CACHE_CONTROL, cache_control),
                (header::CONTENT_TYPE, HTML_CONTENT_TYPE.to_owned()),
            ],
            page.html.clone(),
        )
            .into_response()
    }

    async fn build(&self, slug: &Slug) -> Result<Arc<Page>, PageError> {
        let started = Instant::now();

        let post = self
            .content
            .fetch_post(slug)
            .await?
            .ok_or_else(|| PageError::NotFound(slug.clone()))?;
        let html = self.render(&post, &SubmissionState::Idle).into_string();

        info!(%slug, elapsed = ?started.elapsed(), "Generated page");

        Ok(Arc::new(Page {
            post,
            html,
            built_at: Instant::now(),
        }))
    }

    fn regenerate(&self, slug: Slug) {
        let Some(guard) = RegenerationGuard::acquire(&self.regenerating, slug) else {
            return;
        };

        let builder = self.clone();
        self.tracker.spawn(async move {
            let slug = &guard.slug;
            match builder.build(slug).await {
                Ok(page) => builder.cache.insert(slug.clone(), page).await,
                Err(PageError::NotFound(_)) => {
                    info!(%slug, "Post disappeared, dropping its page");
                    builder.cache.invalidate(slug).await;
                }
                Err(error) => {
                    warn!(%slug, %error, "Regeneration failed, keeping the stale page");
                }
            }
        });
    }
}

/// Marks a slug as regenerating for as long as it lives.
struct RegenerationGuard {
    regenerating: Arc<Mutex<HashSet<Slug>>>,
    slug: Slug,
}

impl RegenerationGuard {
    fn acquire(regenerating: &Arc<Mutex<HashSet<Slug>>>, slug: Slug) -> Option<Self> {
        let newly_marked = regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(slug.clone());

        newly_marked.then(|| Self {
            regenerating: Arc::clone(regenerating),
            slug,
        })
    }
}

impl Drop for RegenerationGuard {
    fn drop(&mut self) {
        self.regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.slug);
    }
}

#[cfg(test)]
mod tests {
    use crate::server::{
        pages::{Page, PageBuilder, PageError},
        testing::{content_client, listing_mock, post_document, post_mock, renderer},
    };
    use axum::http::header;
    use postpress_common::{
        model::{post::Post, slug::Slug},
        util::PositiveDuration,
    };
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::task::TaskTracker;
    use wiremock::MockServer;

    fn slug(slug: &str) -> Slug {
        Slug::new(slug.to_owned()).unwrap()
    }

    fn builder(
        server: &MockServer,
        revalidate: PositiveDuration,
        tracker: TaskTracker,
    ) -> PageBuilder {
        PageBuilder::new(content_client(server), renderer(), revalidate, tracker)
    }

    fn minute() -> PositiveDuration {
        PositiveDuration::from_secs(60).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn pages_go_stale_after_the_interval() {
        let page = Page {
            post: Post::new(
                "p1".into(),
                slug("post"),
                time::OffsetDateTime::UNIX_EPOCH,
                None,
                postpress_common::model::post::PostContent::default(),
            ),
            html: String::new(),
            built_at: Instant::now(),
        };

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!page.is_stale(minute()));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(page.is_stale(minute()));
    }

    #[tokio::test]
    async fn fresh_pages_are_served_byte_identical() {
        let server = MockServer::start().await;
        post_mock("first", post_document("p1", "first", "First post"))
            .expect(1)
            .mount(&server)
            .await;

        let pages = builder(&server, minute(), TaskTracker::new());
        let first = pages.page(&slug("first")).await.unwrap();
        let second = pages.page(&slug("first")).await.unwrap();

        assert!(first.html.contains("First post"));
        assert_eq!(first.html, second.html);
    }

    #[tokio::test]
    async fn concurrent_first_requests_share_one_generation() {
        let server = MockServer::start().await;
        post_mock("first", post_document("p1", "first", "First post"))
            .expect(1)
            .mount(&server)
            .await;

        let pages = builder(&server, minute(), TaskTracker::new());
        let slug = slug("first");
        let (a, b) = tokio::join!(pages.page(&slug), pages.page(&slug));

        assert_eq!(a.unwrap().html, b.unwrap().html);
    }

    #[tokio::test]
    async fn missing_posts_are_not_cached() {
        let server = MockServer::start().await;
        post_mock("gone", serde_json::Value::Null)
            .expect(2)
            .mount(&server)
            .await;

        let pages = builder(&server, minute(), TaskTracker::new());
        for _ in 0..2 {
            let error = pages.page(&slug("gone")).await.unwrap_err();
            assert!(matches!(*error, PageError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn content_failures_propagate() {
        let server = MockServer::start().await;

        let pages = builder(&server, minute(), TaskTracker::new());
        let error = pages.page(&slug("first")).await.unwrap_err();
        assert!(matches!(*error, PageError::Content(_)));
    }

    #[tokio::test]
    async fn stale_pages_are_served_while_regenerating() {
        let server = MockServer::start().await;
        post_mock("first", post_document("p1", "first", "Old title"))
            .mount(&server)
            .await;

        let tracker = TaskTracker::new();
        let pages = builder(
            &server,
            PositiveDuration::from_secs(1).unwrap(),
            tracker.clone(),
        );
        let old = pages.page(&slug("first")).await.unwrap();

        server.reset().await;
        post_mock("first", post_document("p1", "first", "New title"))
            .expect(1)
            .mount(&server)
            .await;
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let stale = pages.page(&slug("first")).await.unwrap();
        assert_eq!(stale.html, old.html);
        pages.page(&slug("first")).await.unwrap();

        tracker.close();
        tracker.wait().await;

        let fresh = pages.page(&slug("first")).await.unwrap();
        assert!(fresh.html.contains("New title"));
    }

    #[tokio::test]
    async fn failed_regeneration_keeps_the_stale_page() {
        let server = MockServer::start().await;
        post_mock("first", post_document("p1", "first", "Old title"))
            .mount(&server)
            .await;

        let tracker = TaskTracker::new();
        let pages = builder(
            &server,
            PositiveDuration::from_secs(1).unwrap(),
            tracker.clone(),
        );
        pages.page(&slug("first")).await.unwrap();

        server.reset().await;
        tokio::time::sleep(Duration::from_millis(1100)).await;
        pages.page(&slug("first")).await.unwrap();

        tracker.close();
        tracker.wait().await;

        let page = pages.page(&slug("first")).await.unwrap();
        assert!(page.html.contains("Old title"));
    }

    #[tokio::test]
    async fn prebuild_generates_every_listed_post() {
        let server = MockServer::start().await;
        listing_mock(&[("p1", "first"), ("p2", "second")])
            .mount(&server)
            .await;
        post_mock("first", post_document("p1", "first", "First post"))
            .expect(1)
            .mount(&server)
            .await;
        post_mock("second", post_document("p2", "second", "Second post"))
            .expect(1)
            .mount(&server)
            .await;

        let pages = builder(&server, minute(), TaskTracker::new());
        assert_eq!(
            pages.static_paths().await.unwrap(),
            ["/post/first", "/post/second"]
        );
        assert_eq!(pages.prebuild().await.unwrap(), 2);

        let second = pages.page(&slug("second")).await.unwrap();
        assert!(second.html.contains("Second post"));
    }

    #[tokio::test]
    async fn responses_carry_cache_headers() {
        let server = MockServer::start().await;
        post_mock("first", post_document("p1", "first", "First post"))
            .mount(&server)
            .await;

        let pages = builder(&server, minute(), TaskTracker::new());
        let page = pages.page(&slug("first")).await.unwrap();
        let response = pages.response(&page);

        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, s-maxage=60, stale-while-revalidate"
        );
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }
}
