// ── Product domain type ──

use serde::{Deserialize, Serialize};

use super::ProductId;

/// A product as the server reports it. The id is always server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    /// Remote image URL (or a `data:` URI echoed back after an upload).
    pub image: String,
    /// Read-only customer rating, absent on freshly created products.
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u32,
}

impl Product {
    /// Price with exactly two fraction digits.
    pub fn price_display(&self) -> String {
        format!("{:.2}", self.price)
    }

    /// Case-insensitive exact category match.
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    /// Title as shown in prompts and headings.
    pub fn display_title(&self) -> &str {
        self.title.trim()
    }
}

/// A validated create/update body with the category already resolved
/// and the image already reduced to the string the API stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
}
