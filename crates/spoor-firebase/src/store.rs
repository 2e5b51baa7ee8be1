//! Firestore implementation of the error store port
//!
//! Error records become documents in the `errors` collection: append-only,
//! no update or delete, listed unfiltered for the administrative view.

use spoor_core::domain::ErrorRecord;
use spoor_core::ports::IErrorStore;

use crate::client::FirestoreClient;
use crate::error::FirebaseError;

/// Name of the Firestore collection holding error records.
pub const ERRORS_COLLECTION: &str = "errors";

/// Append-only error log backed by a Firestore collection.
pub struct FirestoreErrorStore {
    client: FirestoreClient,
}

impl FirestoreErrorStore {
    /// Creates a store over the given client.
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IErrorStore for FirestoreErrorStore {
    async fn append(&self, record: &ErrorRecord) -> anyhow::Result<()> {
        let value = serde_json::to_value(record)?;
        let fields = value
            .as_object()
            .ok_or_else(|| FirebaseError::Decode("error record is not an object".into()))?;

        self.client.create_document(ERRORS_COLLECTION, fields).await?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<ErrorRecord>> {
        let documents = self.client.list_documents(ERRORS_COLLECTION).await?;

        let mut records = Vec::with_capacity(documents.len());
        for fields in documents {
            match serde_json::from_value::<ErrorRecord>(serde_json::Value::Object(fields)) {
                Ok(record) => records.push(record),
                Err(e) => {
                    // A malformed document must not hide the rest of the log.
                    tracing::warn!(error = %e, "Skipping undecodable error document");
                }
            }
        }
        Ok(records)
    }
}
