//! Strongly-typed identifier value objects.
//!
//! All persistent entities use `BIGSERIAL` surrogate keys; the newtypes keep
//! a beat id from being passed where a payment id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database key.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw key.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a registered user (producer or buyer).
    UserId
);
define_id!(
    /// Unique identifier for a beat.
    BeatId
);
define_id!(
    /// Unique identifier for a sound pack.
    SoundPackId
);
define_id!(
    /// Unique identifier for a purchasable file tier of a beat.
    BeatFileId
);
define_id!(
    /// Unique identifier for a checkout attempt.
    PaymentId
);
define_id!(
    /// Unique identifier for a fulfilled sale.
    SaleId
);
define_id!(
    /// Unique identifier for a generated contract.
    ContractId
);
define_id!(
    /// Unique identifier for a contract template.
    ContractTemplateId
);
define_id!(
    /// Unique identifier for a discount code.
    DiscountId
);
define_id!(
    /// Unique identifier for a wishlist entry.
    WishlistId
);
