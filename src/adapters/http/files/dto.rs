//! Response bodies for file access endpoints.

use serde::Serialize;

use crate::application::file_access::FileGrant;

#[derive(Debug, Serialize)]
pub struct FileGrantResponse {
    pub file_url: String,
    pub contract_url: Option<String>,
}

impl From<FileGrant> for FileGrantResponse {
    fn from(grant: FileGrant) -> Self {
        FileGrantResponse {
            file_url: grant.file_url,
            contract_url: grant.contract_url,
        }
    }
}
