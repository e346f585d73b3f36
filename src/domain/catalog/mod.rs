//! Catalog domain: sellable items and their file tiers.

mod beat;
mod contract_template;
mod purchasable;
mod soundpack;

pub use beat::{Beat, BeatFile, FileType};
pub use contract_template::ContractTemplate;
pub use purchasable::{ItemKind, Purchasable};
pub use soundpack::SoundPack;
