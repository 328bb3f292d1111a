//! Request-level error type, mapped to the JSON bodies clients see.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::validate::FieldErrors;

/// Everything a handler can fail with. Every variant produces a terminal
/// response; store failures are logged server-side and surfaced as a
/// generic 500, never as raw database detail.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input")]
    Validation(FieldErrors),

    #[error("email already registered")]
    EmailTaken,

    #[error("user not found")]
    UserNotFound,

    #[error("password incorrect")]
    WrongPassword,

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ApiError::EmailTaken => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "email": "Email already exists" })),
            )
                .into_response(),
            ApiError::UserNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "email": "User not found" })),
            )
                .into_response(),
            ApiError::WrongPassword => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "password": "Password incorrect" })),
            )
                .into_response(),
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Db(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn user_not_found_maps_to_404_with_field_message() {
        let res = ApiError::UserNotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await, json!({ "email": "User not found" }));
    }

    #[tokio::test]
    async fn wrong_password_maps_to_400_with_field_message() {
        let res = ApiError::WrongPassword.into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(res).await,
            json!({ "password": "Password incorrect" })
        );
    }

    #[tokio::test]
    async fn store_errors_hide_detail_from_the_client() {
        let res = ApiError::Db(sqlx::Error::PoolClosed).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await,
            json!({ "error": "Internal server error" })
        );
    }
}
