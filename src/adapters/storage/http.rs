//! Hosted object storage client.
//!
//! Uploads via `PUT {base}/{category}/{filename}` with a bearer key, the
//! scheme exposed by S3-compatible file hosts. The retrieval URL comes back
//! in the response body.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{ObjectStorage, StorageError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

pub struct HttpObjectStorage {
    base_url: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl HttpObjectStorage {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            api_key: SecretString::new(api_key.into()),
            http_client,
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn store(
        &self,
        bytes: Vec<u8>,
        category: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let url = format!("{}/{}/{}", self.base_url, category, filename);

        let response = self
            .http_client
            .put(&url)
            .bearer_auth(self.api_key.expose_secret())
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::upload(format!(
                "upload returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::upload(format!("bad upload response: {e}")))?;

        Ok(body.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_parses_url() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"url": "https://files.example/contracts/c1.md"}"#).unwrap();
        assert_eq!(parsed.url, "https://files.example/contracts/c1.md");
    }
}
