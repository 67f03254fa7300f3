// ── Home view ──

use crate::model::Product;
use crate::store::{CatalogSnapshot, RefreshFailure};

/// Position of the featured product in the catalog.
pub const FEATURED_INDEX: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum HomeState {
    Loading,
    Error(String),
    Featured(Product),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HomeView;

impl HomeView {
    /// The third product, or the last one when fewer are loaded.
    pub fn render(snapshot: &CatalogSnapshot, last_error: Option<&RefreshFailure>) -> HomeState {
        if let Some(failure) = last_error {
            return HomeState::Error(failure.message.clone());
        }
        let products = snapshot.products();
        products
            .get(FEATURED_INDEX)
            .or_else(|| products.last())
            .map_or(HomeState::Loading, |p| HomeState::Featured(p.clone()))
    }
}
