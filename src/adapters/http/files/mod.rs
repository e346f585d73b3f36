//! File access HTTP module.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::file_routes;
