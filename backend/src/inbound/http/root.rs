//! Root greeting endpoint.

use actix_web::{HttpResponse, get, http::header::ContentType};

/// Plain-text greeting served at the site root.
#[utoipa::path(
    get,
    path = "/",
    tags = ["root"],
    security([]),
    responses(
        (status = 200, description = "Greeting", body = String, content_type = "text/plain")
    )
)]
#[get("/")]
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("Hello, World!")
}
