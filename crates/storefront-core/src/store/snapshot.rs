// ── Catalog snapshot ──

use chrono::{DateTime, Utc};

use crate::model::{Product, ProductId, derive_categories};

/// One complete product list as returned by a single refresh.
///
/// Snapshots are immutable and shared behind `Arc`; a refresh replaces
/// the whole snapshot, so readers never see a partially applied list.
/// Categories are derived once per snapshot.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    generation: u64,
    products: Vec<Product>,
    categories: Vec<String>,
    fetched_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    pub(crate) fn new(generation: u64, products: Vec<Product>) -> Self {
        let categories = derive_categories(&products);
        Self {
            generation,
            products,
            categories,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Ticket of the refresh that produced this snapshot (0 = never loaded).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Products in server response order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories, in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
