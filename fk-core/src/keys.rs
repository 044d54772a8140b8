//! Secret keys, form keys and their one-way binding.
//!
//! A form owner generates a [`SecretKey`] and keeps it private. The public [`FormKey`] is
//! derived from it under the process-wide [`ServerKey`]:
//!
//! ```text
//! form_key = HMAC-SHA256(key = server_key, msg = secret)[..24]
//! ```
//!
//! The derivation is deterministic, so the owner can re-derive the form key at any time by
//! presenting the secret. Nothing in this module maps a form key back to a secret.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use base64ct::{Base64Url, Encoding};
use hmac::{Hmac, Mac};
use rand::{CryptoRng, RngCore};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::consts::*;
use crate::error::Error;

pub(crate) type HmacSha256 = Hmac<Sha256>;

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], Error> {
    let raw = Base64Url::decode_vec(s)?;
    raw.as_slice().try_into().map_err(|_| Error::InvalidLength {
        expected: N,
        found: raw.len(),
    })
}

/// The private secret of a form owner.
///
/// Possession of the secret is both necessary and sufficient to prove ownership of the derived
/// [`FormKey`]. The secret is never persisted by the server, its `Debug` output is redacted and
/// the bytes are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_SIZE]);

impl SecretKey {
    /// Generates a fresh secret key.
    ///
    /// Failure of the random source is fatal.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SECRET_KEY_SIZE];
        rng.fill_bytes(&mut bytes);

        Self(bytes)
    }

    /// Decodes a secret key from its URL-safe base64 text form.
    pub fn decode(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::MissingField("secret"));
        }

        decode_fixed(s).map(Self)
    }

    /// Encodes the secret key as URL-safe base64 text.
    ///
    /// The result is the secret itself, handle it accordingly.
    pub fn encode(&self) -> String {
        Base64Url::encode_string(&self.0)
    }

    /// The raw bytes of the secret key.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_SIZE] {
        &self.0
    }
}

impl From<[u8; SECRET_KEY_SIZE]> for SecretKey {
    fn from(bytes: [u8; SECRET_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// The process-wide key mixed into every form key derivation.
///
/// If it changes, all form keys previously derived under it can no longer be recovered from
/// their secrets.
#[derive(Clone)]
pub struct ServerKey {
    mac: HmacSha256,
}

impl ServerKey {
    /// Creates the server key from opaque key material.
    ///
    /// Empty key material is refused.
    pub fn new(raw: &[u8]) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::EmptyKey);
        }

        let mac = HmacSha256::new_from_slice(raw).map_err(|_| Error::EmptyKey)?;

        Ok(Self { mac })
    }
}

impl fmt::Debug for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerKey(..)")
    }
}

/// The public, deterministic derivative of a [`SecretKey`].
///
/// Used as the tag of every submission addressed to the owner and as the lookup predicate when
/// the owner queries them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormKey([u8; FORM_KEY_SIZE]);

impl FormKey {
    /// Derives the form key of `secret` under `server_key`.
    ///
    /// This is a pure function: the same inputs always produce the same output.
    pub fn derive(secret: &SecretKey, server_key: &ServerKey) -> Self {
        let digest = server_key
            .mac
            .clone()
            .chain_update(secret.as_bytes())
            .finalize()
            .into_bytes();

        let mut key = [0u8; FORM_KEY_SIZE];
        key.copy_from_slice(&digest[..FORM_KEY_SIZE]);

        Self(key)
    }

    /// The raw bytes of the form key.
    pub fn as_bytes(&self) -> &[u8; FORM_KEY_SIZE] {
        &self.0
    }

    /// Compares the text form of this key with an untrusted tag, in constant time with respect
    /// to the tag contents.
    pub fn matches(&self, tag: &str) -> bool {
        let encoded = self.to_string();
        bool::from(encoded.as_bytes().ct_eq(tag.as_bytes()))
    }
}

impl From<[u8; FORM_KEY_SIZE]> for FormKey {
    fn from(bytes: [u8; FORM_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl ConstantTimeEq for FormKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Base64Url::encode_string(&self.0))
    }
}

impl fmt::Debug for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormKey({self})")
    }
}

impl FromStr for FormKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::MissingField("form key"));
        }

        decode_fixed(s).map(Self)
    }
}

impl Serialize for FormKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Generates a fresh secret together with its form key.
pub fn generate_pair<R: RngCore + CryptoRng>(
    server_key: &ServerKey,
    rng: &mut R,
) -> (SecretKey, FormKey) {
    let secret = SecretKey::generate(rng);
    let form_key = FormKey::derive(&secret, server_key);

    (secret, form_key)
}
