use crate::server::{
    Result, ServerError, ServerRouter,
    form::Form,
    json::{ApiError, Json},
    pages::PageBuilder,
    submission::SubmissionFlow,
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use maud::Markup;
use postpress_common::model::{comment::CommentDraft, slug::Slug};
use postpress_content::{client::ContentClient, submit::CommentSubmitter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_post(submit_comment)
        .typed_post(create_comment)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/post/{slug}/comment", rejection(ServerError))]
struct SubmitCommentPath {
    slug: Slug,
}

async fn submit_comment(
    SubmitCommentPath { slug }: SubmitCommentPath,
    State(pages): State<PageBuilder>,
    State(submitter): State<CommentSubmitter>,
    Form(draft): Form<CommentDraft>,
) -> Result<Markup> {
    let page = pages.page(&slug).await?;

    let mut flow = SubmissionFlow::new(&submitter, &page.post);
    flow.submit(draft).await;

    Ok(pages.render(&page.post, flow.state()))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/api/createComment", rejection(ServerError))]
struct CreateCommentPath();

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct CommentCreated {
    message: &'static str,
}

async fn create_comment(
    CreateCommentPath(): CreateCommentPath,
    State(content): State<Arc<ContentClient>>,
    Json(draft): Json<CommentDraft>,
) -> Result<Json<CommentCreated>, ApiError> {
    let submission = draft.validate().map_err(ServerError::from)?;
    let id = content
        .create_comment(&submission)
        .await
        .map_err(ServerError::from)?;

    info!(post = %submission.post, comment = %id, "Comment awaiting moderation");

    Ok(Json(CommentCreated {
        message: "Comment submitted",
    }))
}
