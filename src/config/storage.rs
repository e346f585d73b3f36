//! Object storage configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Which storage adapter to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Local filesystem (development).
    #[default]
    Local,
    /// Hosted object store over HTTP.
    Http,
}

/// Object storage configuration for generated contract documents.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Local backend: directory objects are written under.
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Public URL prefix objects are served from.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// HTTP backend: upload endpoint base URL.
    #[serde(default)]
    pub upload_base_url: String,

    /// HTTP backend: API key.
    #[serde(default)]
    pub api_key: String,
}

fn default_local_path() -> String {
    "./var/objects".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/files".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            local_path: default_local_path(),
            public_base_url: default_public_base_url(),
            upload_base_url: String::new(),
            api_key: String::new(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Local => {
                if self.local_path.is_empty() {
                    return Err(ValidationError::MissingRequired("STORAGE_LOCAL_PATH"));
                }
            }
            StorageBackend::Http => {
                if self.upload_base_url.is_empty() {
                    return Err(ValidationError::MissingRequired("STORAGE_UPLOAD_BASE_URL"));
                }
                if self.api_key.is_empty() {
                    return Err(ValidationError::MissingRequired("STORAGE_API_KEY"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_default_is_valid() {
        assert!(StorageConfig::default().validate().is_ok());
    }

    #[test]
    fn http_backend_requires_endpoint_and_key() {
        let config = StorageConfig {
            backend: StorageBackend::Http,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StorageConfig {
            backend: StorageBackend::Http,
            upload_base_url: "https://storage.example".to_string(),
            api_key: "key".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
