//! Error store port (driven/secondary port)
//!
//! The remote log store is an append-only document collection: each error
//! report becomes one document, and no update or delete operations are
//! defined. The listing operation exists for the administrative view and
//! returns documents unfiltered, in whatever order the store assigns.

use crate::domain::ErrorRecord;

/// Port trait for the append-only remote error log.
#[async_trait::async_trait]
pub trait IErrorStore: Send + Sync {
    /// Append one record to the collection.
    async fn append(&self, record: &ErrorRecord) -> anyhow::Result<()>;

    /// List all stored records, unfiltered and unpaginated, in
    /// store-assigned order.
    async fn list(&self) -> anyhow::Result<Vec<ErrorRecord>>;
}
