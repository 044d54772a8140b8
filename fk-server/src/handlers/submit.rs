use actix_web::{
    http::header,
    web::{Data, Form, Json, Path},
    Either, HttpResponse,
};
use fk_core::api::{SubmissionReceipt, NEXT_FIELD, TOKEN_FIELD};
use fk_core::submission::Fields;
use fk_core::token::EmailToken;

use crate::correlator::Correlator;
use crate::util::is_redirect_target;

/// Accepts a submission for any form key, as a urlencoded form or a flat JSON object.
///
/// The reserved fields are never stored. A valid `_token` triggers a notification, a valid
/// `_next` turns the response into a redirect.
pub async fn submit(
    correlator: Data<Correlator>,
    form_key: Path<String>,
    body: Either<Json<Fields>, Form<Fields>>,
) -> Result<HttpResponse, crate::Error> {
    let mut fields = match body {
        Either::Left(Json(fields)) => fields,
        Either::Right(Form(fields)) => fields,
    };

    let token = fields
        .remove(TOKEN_FIELD)
        .filter(|t| !t.trim().is_empty())
        .map(EmailToken::from);

    let next = fields
        .remove(NEXT_FIELD)
        .filter(|n| is_redirect_target(n));

    let (id, submission) = correlator
        .record_submission(&form_key.into_inner(), fields)
        .await?;

    correlator
        .notify_if_authorized(&submission, token.as_ref())
        .await;

    match next {
        Some(next) => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, next))
            .finish()),
        None => Ok(HttpResponse::Created().json(SubmissionReceipt {
            id,
            form_key: submission.form_key,
            timestamp: submission.timestamp,
        })),
    }
}
