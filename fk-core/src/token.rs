//! Email tokens: an email address bound to a form key.
//!
//! A token is the authenticated encryption of `{email, form_key, issued_at}` under the
//! process-wide [`TokenKey`]. It carries the already derived form key, never the secret it was
//! derived from, so a token that ends up in logs or mail archives reveals nothing about the
//! owner's secret.
//!
//! # Wire format
//!
//! ```text
//! TOKEN = base64url(VERSION (1) || NONCE (12) || AES-256-GCM(PAYLOAD) (*) || TAG (16))
//! ```
//!
//! The version byte is bound to the ciphertext as associated data. `PAYLOAD` is the bincode
//! encoding of the claims.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64ct::{Base64Url, Encoding};
use hmac::Mac;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::consts::*;
use crate::error::Error;
use crate::keys::{FormKey, HmacSha256, SecretKey, ServerKey};

/// The process-wide symmetric key securing email tokens.
///
/// The AES-256-GCM key is derived from the configured key material with HMAC-SHA256, so any
/// non-empty byte string is accepted.
pub struct TokenKey {
    aead: Aes256Gcm,
}

impl TokenKey {
    /// Creates the token key from opaque key material.
    ///
    /// Empty key material is refused.
    pub fn new(raw: &[u8]) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::EmptyKey);
        }

        let digest = <HmacSha256 as Mac>::new_from_slice(raw)
            .map_err(|_| Error::EmptyKey)?
            .chain_update(TOKEN_KEY_LABEL)
            .finalize()
            .into_bytes();

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&digest[..KEY_SIZE]);
        let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        key.zeroize();

        Ok(Self { aead })
    }
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKey(..)")
    }
}

/// The verified contents of an [`EmailToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// The email address authorized to receive notifications.
    pub email: String,

    /// The form key the email address is bound to.
    pub form_key: FormKey,

    /// Issuance time (UNIX time).
    pub issued_at: u64,
}

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    email: String,
    form_key: [u8; FORM_KEY_SIZE],
    issued_at: u64,
}

/// Why a token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The token is not in the token format.
    Malformed,
    /// The integrity check failed: the token was altered or sealed under another key.
    Forged,
    /// The token is older than the allowed maximum age, or issued in the future.
    Chronology,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::Forged => write!(f, "token failed the integrity check"),
            Self::Chronology => write!(f, "token expired or not yet valid"),
        }
    }
}

/// The outcome of [`EmailToken::verify`].
///
/// A rejected token is an expected outcome and is never reported as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The token is authentic and within its validity window.
    Verified(TokenClaims),
    /// The token was not accepted.
    Rejected(Rejection),
}

impl Verification {
    /// Returns the claims of a verified token.
    pub fn claims(self) -> Option<TokenClaims> {
        match self {
            Self::Verified(claims) => Some(claims),
            Self::Rejected(_) => None,
        }
    }

    /// Whether the token was verified.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }
}

/// An opaque bearer token binding an email address to a form key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailToken(String);

impl EmailToken {
    /// Issues a token binding `email` to the form key derived from `secret`.
    ///
    /// The raw secret is only used to derive the form key; it does not end up in the token.
    pub fn issue<R: RngCore + CryptoRng>(
        email: &str,
        secret: &SecretKey,
        server_key: &ServerKey,
        key: &TokenKey,
        issued_at: u64,
        rng: &mut R,
    ) -> Result<Self, Error> {
        Self::bind(
            email,
            FormKey::derive(secret, server_key),
            key,
            issued_at,
            rng,
        )
    }

    /// Issues a token binding `email` to an already derived `form_key`.
    pub fn bind<R: RngCore + CryptoRng>(
        email: &str,
        form_key: FormKey,
        key: &TokenKey,
        issued_at: u64,
        rng: &mut R,
    ) -> Result<Self, Error> {
        if email.trim().is_empty() {
            return Err(Error::MissingField("email"));
        }

        let claims = TokenClaims {
            email: email.into(),
            form_key,
            issued_at,
        };

        Self::seal(&claims, key, rng)
    }

    /// Seals arbitrary claims into a token.
    pub fn seal<R: RngCore + CryptoRng>(
        claims: &TokenClaims,
        key: &TokenKey,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let payload = bincode::serialize(&TokenPayload {
            email: claims.email.clone(),
            form_key: *claims.form_key.as_bytes(),
            issued_at: claims.issued_at,
        })?;

        let mut nonce = [0u8; IV_SIZE];
        rng.fill_bytes(&mut nonce);

        let version = [TOKEN_VERSION_V1];
        let ct = key.aead.encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: &payload,
                aad: &version,
            },
        )?;

        let mut out = Vec::with_capacity(VERSION_SIZE + IV_SIZE + ct.len());
        out.extend_from_slice(&version);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ct);

        Ok(Self(Base64Url::encode_string(&out)))
    }

    /// Verifies the token at time `now`, accepting tokens at most `max_age` seconds old.
    ///
    /// The payload is only decoded after the integrity tag has been checked.
    pub fn verify(&self, key: &TokenKey, now: u64, max_age: u64) -> Verification {
        let raw = match Base64Url::decode_vec(self.0.trim()) {
            Ok(raw) if raw.len() >= MIN_TOKEN_SIZE => raw,
            _ => return Verification::Rejected(Rejection::Malformed),
        };

        let (version, rest) = raw.split_at(VERSION_SIZE);
        if version[0] != TOKEN_VERSION_V1 {
            return Verification::Rejected(Rejection::Malformed);
        }

        let (nonce, ct) = rest.split_at(IV_SIZE);
        let plain = match key.aead.decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ct,
                aad: version,
            },
        ) {
            Ok(plain) => plain,
            Err(_) => return Verification::Rejected(Rejection::Forged),
        };

        let payload: TokenPayload = match bincode::deserialize(&plain) {
            Ok(payload) => payload,
            Err(_) => return Verification::Rejected(Rejection::Malformed),
        };

        if payload.issued_at > now.saturating_add(TOKEN_CLOCK_LEEWAY)
            || now.saturating_sub(payload.issued_at) > max_age
        {
            return Verification::Rejected(Rejection::Chronology);
        }

        Verification::Verified(TokenClaims {
            email: payload.email,
            form_key: FormKey::from(payload.form_key),
            issued_at: payload.issued_at,
        })
    }

    /// The text form of the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EmailToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EmailToken {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for EmailToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for EmailToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EmailToken(..)")
    }
}
