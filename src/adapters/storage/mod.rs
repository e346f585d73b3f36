//! Object storage adapters.

mod http;
mod local;

pub use http::HttpObjectStorage;
pub use local::LocalObjectStorage;
