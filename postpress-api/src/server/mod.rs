use crate::render::error_page;
use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{FormRejection, JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use pages::{PageBuilder, PageError};
use postpress_common::model::comment::FieldErrors;
use postpress_content::{
    client::{ContentClient, ContentError},
    submit::CommentSubmitter,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

mod form;
mod json;
pub mod pages;
mod routes;
mod submission;
#[cfg(test)]
mod testing;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub content: Arc<ContentClient>,
    pub pages: PageBuilder,
    pub submitter: CommentSubmitter,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming form rejected: {0}")]
    FormRejection(#[from] FormRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Page(#[from] Arc<PageError>),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    InvalidComment(#[from] FieldErrors),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) | ServerError::PathRejection(_) => StatusCode::NOT_FOUND,
            ServerError::Page(error) => match error.as_ref() {
                PageError::NotFound(_) => StatusCode::NOT_FOUND,
                PageError::Content(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ServerError::Content(ContentError::MissingToken) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::FormRejection(_)
            | ServerError::JsonRejection(_)
            | ServerError::InvalidComment(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_) | ServerError::Content(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ServerError::InvalidComment(errors) => Some(errors),
            _ => None,
        }
    }

    fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            warn!(error = %self, %status, "Replying with error");
        }
    }
}

fn user_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "This page could not be found.",
        StatusCode::BAD_REQUEST => "The request could not be understood.",
        StatusCode::SERVICE_UNAVAILABLE => "This feature is currently unavailable.",
        _ => "Something went wrong. Please try again later.",
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        self.log(status);

        (status, error_page(status, user_message(status))).into_response()
    }
}
