// ── Domain model ──
//
// Canonical types consumed by the store, the form lifecycles and the
// views. Wire types from storefront-api are converted in `convert.rs`.

pub mod category;
pub mod product;

pub use category::{CategorySelection, OTHER_CATEGORY, derive_categories, make_title_case};
pub use product::{Product, ProductPayload, Rating};
pub use storefront_api::ProductId;
