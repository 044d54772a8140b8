//! Submission record stores.
//!
//! The correlator only needs two operations: append a record tagged with a form key, and fetch
//! every record carrying exactly that tag, in insertion order.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use fk_core::submission::{Fields, Submission};

/// Store-assigned identifier of a submission.
pub type RecordId = u64;

/// Trait for submission storage. Implement this trait to provide a custom record store.
///
/// Implementations are shared by all workers, hence `Send + Sync`; the returned futures run on
/// the worker's own runtime and need not be `Send`.
#[async_trait::async_trait(?Send)]
pub trait SubmissionStore: Send + Sync {
    /// Append a submission. `fields` and `timestamp` must be preserved verbatim.
    async fn put(
        &self,
        form_key: &str,
        fields: &Fields,
        timestamp: u64,
    ) -> Result<RecordId, crate::Error>;

    /// All submissions whose tag equals `form_key`, in insertion order.
    async fn query_by_form_key(&self, form_key: &str) -> Result<Vec<Submission>, crate::Error>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A store whose backend is always down.
    #[derive(Default)]
    pub(crate) struct FailingStore;

    #[async_trait::async_trait(?Send)]
    impl SubmissionStore for FailingStore {
        async fn put(&self, _: &str, _: &Fields, _: u64) -> Result<RecordId, crate::Error> {
            Err(crate::Error::Store)
        }

        async fn query_by_form_key(&self, _: &str) -> Result<Vec<Submission>, crate::Error> {
            Err(crate::Error::Store)
        }
    }

    pub(crate) fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Exercises the store contract against any implementation.
    pub(crate) async fn check_store(store: &dyn SubmissionStore) {
        let a1 = store
            .put("form-a", &fields(&[("name", "Alice")]), 10)
            .await
            .unwrap();
        let b1 = store
            .put("form-b", &fields(&[("name", "Bob")]), 11)
            .await
            .unwrap();
        let a2 = store
            .put("form-a", &fields(&[("name", "Carol"), ("note", "é ✓")]), 12)
            .await
            .unwrap();

        assert!(a1 < b1 && b1 < a2);

        let a = store.query_by_form_key("form-a").await.unwrap();
        assert_eq!(
            a,
            vec![
                Submission::new("form-a", fields(&[("name", "Alice")]), 10),
                Submission::new("form-a", fields(&[("name", "Carol"), ("note", "é ✓")]), 12),
            ]
        );

        let b = store.query_by_form_key("form-b").await.unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(b[0].fields["name"], "Bob");

        assert!(store.query_by_form_key("form").await.unwrap().is_empty());
        assert!(store.query_by_form_key("FORM-A").await.unwrap().is_empty());
    }
}
