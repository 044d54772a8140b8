use actix_web::{web::Data, HttpResponse};
use fk_core::api::FormCredentials;

use crate::correlator::Correlator;

/// Generates a new secret and returns it with its form key.
///
/// Nothing is stored: the secret is the only record of ownership.
pub async fn keys(correlator: Data<Correlator>) -> Result<HttpResponse, crate::Error> {
    let (secret, form_key) = correlator.generate_credentials();

    Ok(HttpResponse::Ok().json(FormCredentials {
        secret: secret.encode(),
        form_key,
    }))
}
