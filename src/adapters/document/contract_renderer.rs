//! Contract document renderer.
//!
//! Produces the legal document granting a buyer rights over a purchased
//! tier: contract type, parties, beat, tier, price, and the template's
//! terms. Output is a markdown document; rendering is a pure function of
//! its inputs so regenerating for the same sale yields identical bytes.

use crate::domain::catalog::{Beat, ContractTemplate, FileType};
use crate::domain::users::User;
use crate::ports::DocumentRenderer;

pub struct ContractDocumentRenderer;

impl DocumentRenderer for ContractDocumentRenderer {
    fn render(
        &self,
        template: &ContractTemplate,
        buyer: &User,
        beat: &Beat,
        file_type: FileType,
    ) -> Vec<u8> {
        let mut doc = String::new();
        doc.push_str("# License Contract\n\n");
        doc.push_str(&format!("**Contract Type:** {}\n\n", template.contract_type));
        doc.push_str(&format!("**Buyer:** {}\n\n", buyer.name));
        doc.push_str(&format!("**Beat:** {}\n\n", beat.title));
        doc.push_str(&format!("**File Type:** {}\n\n", file_type));
        doc.push_str(&format!("**Price:** {:.2} USD\n\n", template.price));
        doc.push_str("## Terms\n\n");
        doc.push_str(template.terms.as_deref().unwrap_or("No additional terms."));
        doc.push('\n');
        doc.into_bytes()
    }
}
