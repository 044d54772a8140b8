use actix_web::{web::Data, web::Json, HttpResponse};
use fk_core::api::{TokenIssued, TokenRequest};
use fk_core::keys::SecretKey;

use crate::correlator::Correlator;

/// Mails an email token binding the requested address to the owner's form key.
///
/// The token is only ever sent to the address it binds, never returned in the response.
pub async fn tokens(
    correlator: Data<Correlator>,
    body: Json<TokenRequest>,
) -> Result<HttpResponse, crate::Error> {
    let TokenRequest { email, secret } = body.into_inner();

    let secret = SecretKey::decode(&secret)?;
    let email = email.trim().to_string();
    let form_key = correlator.issue_token(&email, &secret).await?;

    Ok(HttpResponse::Accepted().json(TokenIssued { email, form_key }))
}
