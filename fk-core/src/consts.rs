//! Constants used in the FormKey protocol.

/// Size of a raw secret key.
///
/// 24 bytes (192 bits) from a cryptographically secure source.
pub const SECRET_KEY_SIZE: usize = 24;

/// Size of a raw form key.
///
/// The HMAC-SHA256 digest is truncated to this many bytes. This matches the entropy of the
/// secret key it is derived from.
pub const FORM_KEY_SIZE: usize = 24;

/// Length of a secret key or form key in URL-safe base64.
pub const ENCODED_KEY_LEN: usize = 32;

/// Version 1 of the email token format.
///
/// Payload is `{email, form_key, issued_at}`, encrypted with AES-256-GCM.
pub const TOKEN_VERSION_V1: u8 = 0x01;

/// Domain separation label used to derive the AEAD key from the configured encryption key.
pub const TOKEN_KEY_LABEL: &[u8] = b"fk-core email token v1";

// Symmetric crypto constants.

/// Size of the symmetric key (AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the initialization vector.
pub const IV_SIZE: usize = 12;

/// Size of the authentication tag.
pub const TAG_SIZE: usize = 16;

/// Size of the version identifier at the start of a token.
pub const VERSION_SIZE: usize = core::mem::size_of::<u8>();

/// The smallest possible raw token: version, nonce and tag around an empty ciphertext.
pub const MIN_TOKEN_SIZE: usize = VERSION_SIZE + IV_SIZE + TAG_SIZE;

/// Default maximum age of an email token, in seconds (7 days).
pub const DEFAULT_TOKEN_MAX_AGE: u64 = 60 * 60 * 24 * 7;

/// How far in the future (in seconds) the issuance time of a token may lie.
///
/// Covers clock differences between processes sharing the same keys.
pub const TOKEN_CLOCK_LEEWAY: u64 = 60;
