use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    Pool(String),
    NotFound,
    Validation(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(detail) => {
                tracing::error!(%detail, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            AppError::Pool(detail) => {
                tracing::error!(%detail, "connection checkout failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Todo Not Found"),
            AppError::Validation(detail) => {
                tracing::warn!(detail, "rejected request body");
                (StatusCode::BAD_REQUEST, "Bad Request")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
