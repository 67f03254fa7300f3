// ── Views ──
//
// Pure presentation state derived from the product store. Views hold no
// I/O; the storefront resolves what they need and the front end renders
// the resulting state.

mod catalog;
mod detail;
mod home;

pub use catalog::{Breadcrumb, CatalogState, CatalogView, NavCategory, nav_categories};
pub use detail::{ADDED_TO_CART, CartNotice, DetailSource, DetailView, QuantityStepper};
pub use home::{FEATURED_INDEX, HomeState, HomeView};

/// Text shown while the first product list is loading.
pub const LOADING_MESSAGE: &str = "Loading products...";
