//! Contract document rendering port.

use crate::domain::catalog::{Beat, ContractTemplate, FileType};
use crate::domain::users::User;

/// Port for rendering a contract document.
///
/// Pure function of its inputs; the same template, buyer, beat and tier
/// always produce the same bytes. Invoked immediately before storage.
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        template: &ContractTemplate,
        buyer: &User,
        beat: &Beat,
        file_type: FileType,
    ) -> Vec<u8>;
}
