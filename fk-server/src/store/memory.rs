use std::sync::RwLock;

use fk_core::submission::{Fields, Submission};

use super::{RecordId, SubmissionStore};

/// In-memory record store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<Submission>>,
}

#[async_trait::async_trait(?Send)]
impl SubmissionStore for MemoryStore {
    async fn put(
        &self,
        form_key: &str,
        fields: &Fields,
        timestamp: u64,
    ) -> Result<RecordId, crate::Error> {
        let mut rows = self.rows.write().map_err(|_| crate::Error::Store)?;
        rows.push(Submission::new(form_key, fields.clone(), timestamp));

        Ok(rows.len() as RecordId)
    }

    async fn query_by_form_key(&self, form_key: &str) -> Result<Vec<Submission>, crate::Error> {
        let rows = self.rows.read().map_err(|_| crate::Error::Store)?;

        Ok(rows
            .iter()
            .filter(|s| s.form_key == form_key)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::check_store;

    #[actix_web::test]
    async fn test_memory_store() {
        check_store(&MemoryStore::default()).await;
    }
}
