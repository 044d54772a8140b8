use actix_web::{web::Data, web::Json, HttpResponse};
use fk_core::api::{QueryRequest, QueryResponse};
use fk_core::keys::SecretKey;

use crate::correlator::Correlator;

pub async fn submissions(
    correlator: Data<Correlator>,
    body: Json<QueryRequest>,
) -> Result<HttpResponse, crate::Error> {
    let secret = SecretKey::decode(&body.secret)?;
    let (form_key, submissions) = correlator.query_submissions(&secret).await?;

    Ok(HttpResponse::Ok().json(QueryResponse {
        form_key,
        submissions,
    }))
}
