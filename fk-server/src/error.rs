use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt::{Display, Formatter};

/// Errors that the FormKey API can reply with.
///
/// These can be turned into an [`HttpResponse`].
#[derive(Debug)]
pub enum Error {
    Core(fk_core::error::Error),
    Prometheus(prometheus::Error),
    Store,
    Mail,
    Unexpected,
}

/// Errors that can occur during setup/running of the service.
pub enum ServerError {
    /// Error during setup, e.g., missing keys.
    Setup(String),

    /// IO error.
    StdIO(std::io::Error),
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::StdIO(e)
    }
}

impl std::fmt::Debug for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Setup(s) => write!(f, "error during setup: {s}"),
            ServerError::StdIO(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl From<fk_core::error::Error> for Error {
    fn from(e: fk_core::error::Error) -> Self {
        Error::Core(e)
    }
}

/// Show the error as an HTTP response for Actix-web.
impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": true,
            "message": format!("{}", self),
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Core(e) if e.is_malformed_input() => StatusCode::BAD_REQUEST,
            Error::Core(_) | Error::Prometheus(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Store | Error::Mail => StatusCode::SERVICE_UNAVAILABLE,
            Error::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::Core(e) if e.is_malformed_input() => write!(f, "rejected: {e}"),
            Error::Core(_) => write!(f, "core"),
            Error::Prometheus(e) => write!(f, "prometheus error: {e}"),
            Error::Store => write!(f, "submission store unavailable"),
            Error::Mail => write!(f, "mail transport unavailable"),
            Error::Unexpected => write!(f, "unexpected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let malformed = Error::Core(fk_core::error::Error::MissingField("secret"));
        assert_eq!(malformed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            malformed.to_string(),
            "rejected: missing or empty field: secret"
        );

        let internal = Error::Core(fk_core::error::Error::Symmetric);
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.to_string(), "core");

        assert_eq!(Error::Store.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(Error::Mail.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
