// --- File: crates/calman_common/src/http.rs ---
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{CalmanError, HttpStatusCode};

impl IntoResponse for CalmanError {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

impl From<JsonRejection> for CalmanError {
    fn from(rejection: JsonRejection) -> Self {
        CalmanError::ParseError(rejection.body_text())
    }
}

impl From<QueryRejection> for CalmanError {
    fn from(rejection: QueryRejection) -> Self {
        CalmanError::ParseError(rejection.body_text())
    }
}

/// `axum::Json` whose rejection renders as a [`CalmanError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(CalmanError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejection renders as a [`CalmanError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(CalmanError))]
pub struct ApiQuery<T>(pub T);
