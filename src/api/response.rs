use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

pub type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(status: StatusCode, message: Option<String>) -> Self {
        let label = if status.is_success() { "success" } else { "error" };
        Self {
            status: label.to_string(),
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> Reply<T> {
    with_status(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> Reply<T> {
    with_status(StatusCode::CREATED, data)
}

fn with_status<T: Serialize>(status: StatusCode, data: T) -> Reply<T> {
    (
        status,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta::new(status, None),
        }),
    )
}

pub fn error<T>(status: StatusCode, message: String) -> Reply<T> {
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: ResponseMeta::new(status, Some(message)),
        }),
    )
}
