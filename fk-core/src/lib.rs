//! # FormKey core library
#![no_std]
#![deny(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links
)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! FormKey collects form submissions for anonymous form owners without a user database. Access
//! is capability based:
//!
//! * A form owner holds a random [`SecretKey`][`keys::SecretKey`]. The public
//! [`FormKey`][`keys::FormKey`] is derived from it under a process-wide
//! [`ServerKey`][`keys::ServerKey`] using HMAC-SHA256, truncated to 24 bytes. Submissions are
//! tagged with the form key; presenting the secret re-derives it and retrieves them.
//!
//! * An [`EmailToken`][`token::EmailToken`] binds an email address to a form key. It is the
//! AES-256-GCM encryption of `{email, form_key, issued_at}` under a process-wide
//! [`TokenKey`][`token::TokenKey`]. Submissions carrying a valid token for their form key trigger
//! a notification to that address, without the secret ever reaching the submission endpoint.
//!
//! Both mechanisms are stateless: the only server-side secrets are the two process-wide keys.
//!
//! ## Examples
//!
//! ### Deriving a form key and binding an email address to it
//!
//! ```
//! use fk_core::keys::{FormKey, SecretKey, ServerKey};
//! use fk_core::token::{EmailToken, TokenKey, Verification};
//! # use fk_core::error::Error;
//!
//! # fn main() -> Result<(), Error> {
//! let mut rng = rand::thread_rng();
//!
//! // Process-wide keys, loaded once at startup.
//! let server_key = ServerKey::new(b"server key material")?;
//! let token_key = TokenKey::new(b"token key material")?;
//!
//! // The owner generates a secret and keeps it private.
//! let secret = SecretKey::generate(&mut rng);
//! let form_key = FormKey::derive(&secret, &server_key);
//!
//! let issued_at = 1_700_000_000;
//! let token = EmailToken::issue(
//!     "owner@example.com",
//!     &secret,
//!     &server_key,
//!     &token_key,
//!     issued_at,
//!     &mut rng,
//! )?;
//!
//! match token.verify(&token_key, issued_at + 60, 3600) {
//!     Verification::Verified(claims) => {
//!         assert_eq!(claims.email, "owner@example.com");
//!         assert_eq!(claims.form_key, form_key);
//!     }
//!     Verification::Rejected(reason) => panic!("rejected: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Token format
//!
//! ```text
//! TOKEN = base64url(VERSION (1) || NONCE (12) || CIPHERTEXT (*) || TAG (16))
//! ```

#[cfg(test)]
extern crate std;

// We depend on alloc for String, Vec and BTreeMap.
extern crate alloc;

pub mod api;
pub mod consts;
pub mod error;
pub mod keys;
pub mod submission;
pub mod token;

pub use keys::{FormKey, SecretKey, ServerKey};
pub use submission::{Fields, Submission};
pub use token::{EmailToken, Rejection, TokenClaims, TokenKey, Verification};

#[doc(hidden)]
pub use consts::*;

#[doc(hidden)]
pub mod test;
