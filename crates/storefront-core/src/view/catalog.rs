// ── Catalog view ──

use serde::Serialize;

use crate::model::{Product, make_title_case};
use crate::router::Route;
use crate::store::{CatalogSnapshot, RefreshFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    /// Nothing loaded yet and no failure recorded.
    Loading,
    /// The last refresh failed.
    Error(String),
    /// Products after the category filter.
    Populated(Vec<Product>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    /// `None` for the active (last) crumb.
    #[serde(skip)]
    pub route: Option<Route>,
}

/// Product list, optionally narrowed to one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
    category: Option<String>,
}

impl CatalogView {
    pub fn new(category: Option<String>) -> Self {
        Self { category }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_category(category: impl Into<String>) -> Self {
        Self::new(Some(category.into()))
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Derive the view state from a snapshot and the last refresh failure.
    pub fn render(
        &self,
        snapshot: &CatalogSnapshot,
        last_error: Option<&RefreshFailure>,
    ) -> CatalogState {
        if let Some(failure) = last_error {
            return CatalogState::Error(failure.message.clone());
        }
        if snapshot.is_empty() {
            return CatalogState::Loading;
        }
        let products = match &self.category {
            Some(category) => snapshot
                .products()
                .iter()
                .filter(|p| p.in_category(category))
                .cloned()
                .collect(),
            None => snapshot.products().to_vec(),
        };
        CatalogState::Populated(products)
    }

    /// Home / Shop All / Category.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "Home".into(),
            route: Some(Route::Home),
        }];
        match &self.category {
            None => crumbs.push(Breadcrumb {
                label: "Shop All".into(),
                route: None,
            }),
            Some(category) => {
                crumbs.push(Breadcrumb {
                    label: "Shop All".into(),
                    route: Some(Route::catalog()),
                });
                crumbs.push(Breadcrumb {
                    label: make_title_case(category),
                    route: None,
                });
            }
        }
        crumbs
    }
}

/// A category entry in the navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavCategory {
    pub category: String,
    pub label: String,
    pub path: String,
}

/// Navigation entries for the snapshot's categories.
pub fn nav_categories(snapshot: &CatalogSnapshot) -> Vec<NavCategory> {
    snapshot
        .categories()
        .iter()
        .map(|category| NavCategory {
            label: make_title_case(category),
            path: Route::category(category.clone()).path(),
            category: category.clone(),
        })
        .collect()
}
