pub mod default_route;
pub mod enrich_route;
pub mod search_route;

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        success: false,
        error: error.into(),
    })
}

pub async fn method_not_allowed() -> HttpResponse {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
