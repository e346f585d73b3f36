//! Document generation adapters.

mod contract_renderer;

pub use contract_renderer::ContractDocumentRenderer;
