use crate::server::{Result, ServerError, ServerRouter, pages::PageBuilder};
use axum::{extract::State, response::Response};
use axum_extra::routing::{RouterExt, TypedPath};
use postpress_common::model::slug::Slug;
use serde::Deserialize;

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/post/{slug}", rejection(ServerError))]
struct GetPostPath {
    slug: Slug,
}

async fn get_post(
    GetPostPath { slug }: GetPostPath,
    State(pages): State<PageBuilder>,
) -> Result<Response> {
    let page = pages.page(&slug).await?;

    Ok(pages.response(&page))
}
