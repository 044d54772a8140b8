//! Submission records.

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::keys::FormKey;

/// The field data of one form post.
pub type Fields = BTreeMap<String, String>;

/// An immutable record of one form post.
///
/// The tag is whatever form key the submitter addressed; it is not validated, since the form key
/// is a capability and not an identity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// The form key this submission is tagged with.
    pub form_key: String,

    /// The submitted fields.
    pub fields: Fields,

    /// Time of submission (UNIX time).
    pub timestamp: u64,
}

impl Submission {
    /// Creates a submission record.
    pub fn new(form_key: impl Into<String>, fields: Fields, timestamp: u64) -> Self {
        Self {
            form_key: form_key.into(),
            fields,
            timestamp,
        }
    }

    /// Whether this submission is tagged with `form_key`.
    pub fn is_for(&self, form_key: &FormKey) -> bool {
        form_key.matches(&self.form_key)
    }

    /// Renders the fields as `name: value` lines, in field order.
    pub fn render_fields(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.fields {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{name}: {value}");
        }

        out
    }
}
