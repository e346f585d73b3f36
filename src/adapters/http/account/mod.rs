//! Account HTTP module.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::account_routes;
