use actix_web::{http::header::ContentType, HttpResponse};

/// Liveness probe. Does not touch the store or the mail transport.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("OK")
}
