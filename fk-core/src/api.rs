//! Definitions of the FormKey REST API.

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::keys::FormKey;
use crate::submission::Submission;

/// Reserved submission field carrying an [`EmailToken`][`crate::token::EmailToken`].
pub const TOKEN_FIELD: &str = "_token";

/// Reserved submission field carrying the redirect target after a successful post.
pub const NEXT_FIELD: &str = "_next";

/// A freshly generated secret and its form key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCredentials {
    /// The secret, in URL-safe base64. Only the owner should ever see this.
    pub secret: String,

    /// The public form key to post submissions to.
    pub form_key: FormKey,
}

/// A request for all submissions of the form owned by `secret`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The owner's secret, in URL-safe base64.
    #[serde(default)]
    pub secret: String,
}

/// The submissions tagged with the owner's form key.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    /// The form key derived from the presented secret.
    pub form_key: FormKey,

    /// All submissions tagged with it, in insertion order.
    pub submissions: Vec<Submission>,
}

/// A request for an email token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenRequest {
    /// The email address to bind.
    #[serde(default)]
    pub email: String,

    /// The owner's secret, in URL-safe base64.
    #[serde(default)]
    pub secret: String,
}

/// Acknowledgement that a token was mailed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIssued {
    /// The address the token was sent to.
    pub email: String,

    /// The form key the token is bound to.
    pub form_key: FormKey,
}

/// Acknowledgement of a stored submission.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    /// The store-assigned record identifier.
    pub id: u64,

    /// The tag the submission was stored under.
    pub form_key: String,

    /// Time of submission (UNIX time).
    pub timestamp: u64,
}
