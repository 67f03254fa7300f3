// storefront-api: Async Rust client for the Fake Store product REST API

pub mod client;
pub mod error;
pub mod models;
mod products;
pub mod transport;

pub use client::ProductClient;
pub use error::Error;
pub use models::{ProductBody, ProductId, ProductResponse, RatingResponse};
pub use transport::{TlsMode, TransportConfig};

/// Public demo API the storefront talks to when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
