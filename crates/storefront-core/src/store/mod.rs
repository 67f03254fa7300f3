// ── Product store ──
//
// Process-wide cache of the product list. Every view reads from the
// current snapshot; only refreshes replace it.

mod product_store;
mod snapshot;

pub use product_store::{ProductStore, RefreshFailure};
pub use snapshot::CatalogSnapshot;
