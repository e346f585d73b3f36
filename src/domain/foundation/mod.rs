//! Foundation types shared across the domain.

mod errors;
mod ids;
mod role;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    BeatFileId, BeatId, ContractId, ContractTemplateId, DiscountId, PaymentId, SaleId,
    SoundPackId, UserId, WishlistId,
};
pub use role::Role;
