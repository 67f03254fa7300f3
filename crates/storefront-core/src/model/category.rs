// ── Categories ──
//
// Categories are free-form strings owned by products. The known set is a
// projection of the current product list; forms additionally offer
// "other" with a custom value.

use indexmap::IndexSet;

use super::Product;

/// The selection value that switches a form to its custom category field.
pub const OTHER_CATEGORY: &str = "other";

/// Distinct categories across `products`, in first-seen order.
pub fn derive_categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.category.as_str())
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Title-case a label: trim, split on whitespace, and capitalize every
/// hyphen-separated sub-word.
///
/// `"men's clothing"` becomes `"Men's Clothing"`; `"t-shirts"` becomes
/// `"T-Shirts"`.
pub fn make_title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Category choice in a product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    Unselected,
    /// One of the categories offered by the picker.
    Known(String),
    /// "other": the submitted category comes from the custom field.
    Other,
}

impl CategorySelection {
    /// Interpret a raw picker value.
    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "" => Self::Unselected,
            other if other.trim().eq_ignore_ascii_case(OTHER_CATEGORY) => Self::Other,
            known => Self::Known(known.to_owned()),
        }
    }

    /// The picker value this selection corresponds to.
    pub fn as_choice(&self) -> &str {
        match self {
            Self::Unselected => "",
            Self::Known(c) => c,
            Self::Other => OTHER_CATEGORY,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, Self::Other)
    }
}
