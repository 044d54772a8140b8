//! Test helpers.

use crate::keys::{FormKey, SecretKey, ServerKey};
use crate::token::TokenKey;
use rand::{CryptoRng, RngCore};

/// A fixed point in time (UNIX time) for tests.
pub const NOW: u64 = 1_700_000_000;

/// A test setup.
#[derive(Debug)]
pub struct TestSetup {
    /// The server key.
    pub server_key: ServerKey,

    /// The email token key.
    pub token_key: TokenKey,

    /// A form owner's secret.
    pub secret: SecretKey,

    /// The form key of `secret` under `server_key`.
    pub form_key: FormKey,
}

impl TestSetup {
    /// Create a new test setup with random keys.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut raw = [0u8; 32];

        rng.fill_bytes(&mut raw);
        let server_key = ServerKey::new(&raw).unwrap();

        rng.fill_bytes(&mut raw);
        let token_key = TokenKey::new(&raw).unwrap();

        let secret = SecretKey::generate(rng);
        let form_key = FormKey::derive(&secret, &server_key);

        Self {
            server_key,
            token_key,
            secret,
            form_key,
        }
    }
}
