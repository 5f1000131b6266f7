use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::runtime::Runtime;
use tracing::debug;
use url::Url;

use super::{runtime, RemoteStore};
use crate::error::SyncError;
use crate::storage::SyncConfig;

/// Document store over plain HTTP: `GET`/`PUT <endpoint>/<collection>/<uid>`
/// with a bearer token.
pub struct HttpDocumentStore {
    client: Client,
    endpoint: Url,
    collection: String,
    runtime: Runtime,
}

impl HttpDocumentStore {
    pub fn new(endpoint: &str, collection: &str) -> Result<Self, SyncError> {
        let trimmed = endpoint.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(SyncError::InvalidEndpoint("endpoint is empty".into()));
        }
        let endpoint = Url::parse(&format!("{trimmed}/"))
            .map_err(|e| SyncError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        let runtime = runtime().map_err(|e| SyncError::Runtime(e.to_string()))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            collection: collection.to_string(),
            runtime,
        })
    }

    pub fn from_config(config: &SyncConfig) -> Result<Self, SyncError> {
        Self::new(&config.endpoint, &config.collection)
    }

    /// URL of one user's document.
    pub fn document_url(&self, uid: &str) -> Result<Url, SyncError> {
        let path = format!(
            "{}/{}",
            urlencoding::encode(&self.collection),
            urlencoding::encode(uid)
        );
        self.endpoint
            .join(&path)
            .map_err(|e| SyncError::InvalidEndpoint(e.to_string()))
    }
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Status {
        status: status.as_u16(),
        body,
    })
}

impl RemoteStore for HttpDocumentStore {
    fn fetch(&self, uid: &str, token: &str) -> Result<Option<Value>, SyncError> {
        let url = self.document_url(uid)?;
        debug!(%url, "fetching cloud document");
        self.runtime.block_on(async {
            let resp = self.client.get(url).bearer_auth(token).send().await?;
            if resp.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let doc: Value = error_for_status(resp).await?.json().await?;
            Ok(Some(doc))
        })
    }

    fn push(&self, uid: &str, token: &str, document: &Value) -> Result<(), SyncError> {
        let url = self.document_url(uid)?;
        debug!(%url, "pushing cloud document");
        self.runtime.block_on(async {
            let resp = self
                .client
                .put(url)
                .bearer_auth(token)
                .json(document)
                .send()
                .await?;
            error_for_status(resp).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_url_escapes_segments() {
        let store = HttpDocumentStore::new("https://example.com/v1/", "users").unwrap();
        let url = store.document_url("a b/c").unwrap();
        assert_eq!(url.as_str(), "https://example.com/v1/users/a%20b%2Fc");
    }

    #[test]
    fn rejects_empty_or_malformed_endpoint() {
        assert!(matches!(
            HttpDocumentStore::new("  ", "users"),
            Err(SyncError::InvalidEndpoint(_))
        ));
        assert!(matches!(
            HttpDocumentStore::new("not a url", "users"),
            Err(SyncError::InvalidEndpoint(_))
        ));
    }
}
