use crate::Error;
use actix_web::HttpResponse;
use prometheus::{Encoder, TextEncoder};

pub async fn metrics() -> Result<HttpResponse, Error> {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(Error::Prometheus)?;

    let body = String::from_utf8(buffer).map_err(|_e| Error::Unexpected)?;

    Ok(HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(body))
}
