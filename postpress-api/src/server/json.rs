use crate::server::ServerError;
use axum::{
    Json as AxumJson,
    extract::{FromRequest, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::ContentType;
use postpress_common::model::comment::CommentField;
use serde::Serialize;

#[derive(FromRequest, Debug, Clone, Copy, Default)]
#[from_request(via(AxumJson), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(json) => (TypedHeader(ContentType::json()), json).into_response(),
            Err(err) => ApiError(ServerError::JsonResponse(err)).into_response(),
        }
    }
}

#[derive(Debug)]
pub struct ApiError(pub ServerError);

impl From<ServerError> for ApiError {
    fn from(error: ServerError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(rejection.into())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct FieldMessage {
    field: CommentField,
    message: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Serialize)]
struct ErrorResponse {
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldMessage>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        self.0.log(status);

        let errors = self.0.field_errors().map(|errors| {
            errors
                .fields()
                .iter()
                .map(|&field| FieldMessage {
                    field,
                    message: field.message(),
                })
                .collect()
        });

        let error_response = ErrorResponse {
            status: status.as_u16(),
            errors,
        };

        match serde_json::to_vec(&error_response) {
            Ok(json) => (status, TypedHeader(ContentType::json()), json).into_response(),
            Err(_) => status.into_response(),
        }
    }
}
