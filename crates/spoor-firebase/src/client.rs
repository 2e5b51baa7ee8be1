//! Firestore REST client
//!
//! Provides a typed HTTP client for the Firestore v1 REST API, scoped to
//! the two operations the error log needs: creating documents in a
//! collection and listing a collection's documents. Authentication uses
//! the project's web API key as a query parameter.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FirebaseError;
use crate::value::{from_fields, to_fields};

/// Base URL for the Firestore v1 REST API.
const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// One document in a list response.
#[derive(Debug, Deserialize)]
struct DocumentResponse {
    /// Fully-qualified document name (projects/.../documents/...)
    #[allow(dead_code)]
    name: Option<String>,
    /// Typed field values
    fields: Option<Map<String, Value>>,
}

/// Response from the list-documents endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    documents: Option<Vec<DocumentResponse>>,
    next_page_token: Option<String>,
}

/// HTTP client for Firestore document operations.
pub struct FirestoreClient {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: String,
}

impl FirestoreClient {
    /// Creates a client for the given project, authenticated by API key.
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_base_url(project_id, api_key, FIRESTORE_BASE_URL)
    }

    /// Creates a client with a custom base URL (useful for testing).
    pub fn with_base_url(
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            project_id: project_id.into(),
            api_key: api_key.into(),
        }
    }

    /// URL of a collection under the project's default database.
    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        )
    }

    /// Creates one document in `collection` from a JSON object.
    ///
    /// The document id is assigned by the store.
    pub async fn create_document(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), FirebaseError> {
        let url = self.collection_url(collection);
        debug!(collection, "Creating Firestore document");

        let body = serde_json::json!({ "fields": to_fields(fields) });
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FirebaseError::Status { status, body });
        }
        Ok(())
    }

    /// Lists all documents of `collection`, following pagination, in the
    /// order the store returns them.
    ///
    /// Documents without fields (empty documents) are skipped.
    pub async fn list_documents(
        &self,
        collection: &str,
    ) -> Result<Vec<Map<String, Value>>, FirebaseError> {
        let url = self.collection_url(collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, &str)> = vec![("key", self.api_key.as_str())];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let response = self.client.get(&url).query(&query).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FirebaseError::Status { status, body });
            }

            let page: ListResponse = response.json().await?;
            for document in page.documents.unwrap_or_default() {
                if let Some(fields) = document.fields {
                    documents.push(from_fields(&fields)?);
                }
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(collection, count = documents.len(), "Listed Firestore documents");
        Ok(documents)
    }
}
