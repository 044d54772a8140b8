//! Process-wide configuration.
//!
//! Built once at startup and shared read-only with every request.

use fk_core::keys::ServerKey;
use fk_core::token::TokenKey;
use std::path::Path;
use std::time::Duration;

use crate::error::ServerError;

/// Default bound on a single mail delivery, in seconds.
pub const DEFAULT_MAIL_TIMEOUT: u64 = 10;

/// The keys and limits every request is served with.
#[derive(Debug)]
pub struct Config {
    /// Key mixed into every form key derivation.
    pub server_key: ServerKey,

    /// Key securing email tokens.
    pub token_key: TokenKey,

    /// Maximum age of an email token, in seconds.
    pub token_max_age: u64,

    /// Bound on a single mail delivery. A slower transport counts as failed.
    pub mail_timeout: Duration,
}

impl Config {
    pub fn new(server_key: ServerKey, token_key: TokenKey, token_max_age: u64) -> Self {
        Self {
            server_key,
            token_key,
            token_max_age,
            mail_timeout: Duration::from_secs(DEFAULT_MAIL_TIMEOUT),
        }
    }

    pub fn with_mail_timeout(mut self, mail_timeout: Duration) -> Self {
        self.mail_timeout = mail_timeout;
        self
    }

    /// Loads both keys from disk. Missing or empty keys are fatal.
    pub fn load(
        server_key_path: impl AsRef<Path>,
        token_key_path: impl AsRef<Path>,
        token_max_age: u64,
    ) -> Result<Self, ServerError> {
        let server_key = read_server_key(server_key_path)?;

        let token_key = TokenKey::new(&read_key(token_key_path, "token key")?)
            .map_err(|e| ServerError::Setup(format!("invalid token key: {e}")))?;

        Ok(Self::new(server_key, token_key, token_max_age))
    }
}

fn read_key(path: impl AsRef<Path>, what: &str) -> Result<Vec<u8>, ServerError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| {
        ServerError::Setup(format!("could not read {what} from {}: {e}", path.display()))
    })?;

    if bytes.is_empty() {
        return Err(ServerError::Setup(format!(
            "{what} in {} is empty",
            path.display()
        )));
    }

    Ok(bytes)
}

pub(crate) fn read_server_key(path: impl AsRef<Path>) -> Result<ServerKey, ServerError> {
    ServerKey::new(&read_key(path, "server key")?)
        .map_err(|e| ServerError::Setup(format!("invalid server key: {e}")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fk_core::DEFAULT_TOKEN_MAX_AGE;

    pub(crate) const TEST_SERVER_KEY: &[u8] = b"test server key";
    pub(crate) const TEST_TOKEN_KEY: &[u8] = b"test token key";

    pub(crate) fn test_config() -> Config {
        Config::new(
            ServerKey::new(TEST_SERVER_KEY).unwrap(),
            TokenKey::new(TEST_TOKEN_KEY).unwrap(),
            DEFAULT_TOKEN_MAX_AGE,
        )
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let server = dir.path().join("server.key");
        let token = dir.path().join("token.key");

        std::fs::write(&server, TEST_SERVER_KEY).unwrap();
        std::fs::write(&token, TEST_TOKEN_KEY).unwrap();

        let config = Config::load(&server, &token, 60).unwrap();
        assert_eq!(config.token_max_age, 60);
    }

    #[test]
    fn test_load_refuses_missing_or_empty_keys() {
        let dir = tempfile::tempdir().unwrap();
        let server = dir.path().join("server.key");
        let token = dir.path().join("token.key");

        std::fs::write(&server, TEST_SERVER_KEY).unwrap();
        assert!(matches!(
            Config::load(&server, &token, 60),
            Err(ServerError::Setup(_))
        ));

        std::fs::write(&token, b"").unwrap();
        assert!(matches!(
            Config::load(&server, &token, 60),
            Err(ServerError::Setup(_))
        ));

        std::fs::write(&token, TEST_TOKEN_KEY).unwrap();
        std::fs::write(&server, b"").unwrap();
        assert!(matches!(
            Config::load(&server, &token, 60),
            Err(ServerError::Setup(_))
        ));
    }
}
