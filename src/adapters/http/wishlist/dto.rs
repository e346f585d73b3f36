//! Request/response bodies for wishlist endpoints.

use serde::{Deserialize, Serialize};

use crate::ports::WishlistEntry;

#[derive(Debug, Deserialize)]
pub struct AddWishlistRequest {
    pub item_type: String,
    pub item_id: i64,
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub data: Vec<WishlistEntry>,
}

#[derive(Debug, Serialize)]
pub struct WishlistItemResponse {
    pub message: String,
    pub data: WishlistEntry,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
