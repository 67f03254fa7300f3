// ── Product detail view ──

use std::time::Duration;

use crate::model::{Product, ProductId};
use crate::store::CatalogSnapshot;

pub const ADDED_TO_CART: &str = "Added to cart!";

/// Where a detail view's product came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    /// Found in the loaded catalog, no request made.
    Cache,
    /// Fetched by id because the catalog did not have it.
    Remote,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub product: Product,
    pub source: DetailSource,
}

impl DetailView {
    /// Resolve `id` from the snapshot alone.
    pub fn from_cache(snapshot: &CatalogSnapshot, id: &ProductId) -> Option<Self> {
        snapshot.find(id).map(|p| Self {
            product: p.clone(),
            source: DetailSource::Cache,
        })
    }

    pub fn fetched(product: Product) -> Self {
        Self {
            product,
            source: DetailSource::Remote,
        }
    }
}

/// Cart quantity picker. Never goes below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    quantity: u32,
}

impl Default for QuantityStepper {
    fn default() -> Self {
        Self { quantity: 1 }
    }
}

impl QuantityStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn increase(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub fn decrease(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Apply a typed quantity; anything below one (or unparseable)
    /// becomes one.
    pub fn set_input(&mut self, text: &str) {
        self.quantity = text.trim().parse::<u32>().unwrap_or(1).max(1);
    }

    /// Add to cart. There is no cart: this only raises the notice.
    pub fn add_to_cart(&self) -> CartNotice {
        CartNotice {
            message: ADDED_TO_CART,
            quantity: self.quantity,
        }
    }
}

/// Transient "added to cart" toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartNotice {
    pub message: &'static str,
    pub quantity: u32,
}

impl CartNotice {
    /// How long the toast stays up.
    pub const DISPLAY: Duration = Duration::from_secs(3);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::product;

    #[test]
    fn stepper_floors_at_one() {
        let mut stepper = QuantityStepper::new();
        assert_eq!(stepper.quantity(), 1);
        stepper.decrease();
        assert_eq!(stepper.quantity(), 1);
        stepper.increase();
        stepper.increase();
        assert_eq!(stepper.quantity(), 3);
        stepper.decrease();
        assert_eq!(stepper.quantity(), 2);
    }

    #[test]
    fn typed_quantity_is_clamped() {
        let mut stepper = QuantityStepper::new();
        stepper.set_input("0");
        assert_eq!(stepper.quantity(), 1);
        stepper.set_input("-4");
        assert_eq!(stepper.quantity(), 1);
        stepper.set_input(" 12 ");
        assert_eq!(stepper.quantity(), 12);
        assert_eq!(stepper.add_to_cart().message, "Added to cart!");
    }

    #[test]
    fn cache_lookup_marks_source() {
        let snapshot = CatalogSnapshot::new(1, vec![product(5, "a")]);
        let view = DetailView::from_cache(&snapshot, &ProductId::from(5)).unwrap();
        assert_eq!(view.source, DetailSource::Cache);
        assert!(DetailView::from_cache(&snapshot, &ProductId::from(6)).is_none());
    }
}
