// ── Navigation routes ──
//
// The storefront's location space. Paths parse into `Route` values and
// render back; anything unrecognized becomes `NotFound`, which redirects
// home after a countdown.

use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

use crate::form::FormExit;
use crate::model::ProductId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// `/products`, optionally narrowed to one category.
    Catalog { category: Option<String> },
    ProductDetail(ProductId),
    AddProduct,
    EditProduct(ProductId),
    NotFound(String),
}

impl Route {
    pub fn catalog() -> Self {
        Route::Catalog { category: None }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Route::Catalog {
            category: Some(category.into()),
        }
    }

    /// Parse a path such as `/products/details/3`.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["products"] => Route::catalog(),
            ["products", "category", category] => Route::category(decode_segment(category)),
            ["products", "details", id] => Route::ProductDetail(ProductId::from(decode_segment(id))),
            ["add-product"] => Route::AddProduct,
            ["edit-product", id] => Route::EditProduct(ProductId::from(decode_segment(id))),
            _ => Route::NotFound(path.to_owned()),
        }
    }

    /// The path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Catalog { category: None } => "/products".into(),
            Route::Catalog {
                category: Some(category),
            } => format!("/products/category/{}", encode_segment(category)),
            Route::ProductDetail(id) => format!("/products/details/{}", encode_segment(id.as_str())),
            Route::AddProduct => "/add-product".into(),
            Route::EditProduct(id) => format!("/edit-product/{}", encode_segment(id.as_str())),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Route::NotFound(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::parse(s))
    }
}

impl From<FormExit<ProductId>> for Route {
    fn from(exit: FormExit<ProductId>) -> Self {
        match exit {
            FormExit::Reset => Route::AddProduct,
            FormExit::ShowDetail(id) => Route::ProductDetail(id),
        }
    }
}

fn decode_segment(segment: &str) -> String {
    // Decode `%XX` escapes but keep a literal `+`.
    let escaped = segment.replace('+', "%2B");
    form_urlencoded::parse(format!("v={escaped}").as_bytes())
        .next()
        .map_or_else(|| segment.to_owned(), |(_, v)| v.into_owned())
}

fn encode_segment(segment: &str) -> String {
    form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_paths_parse() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/products"), Route::catalog());
        assert_eq!(Route::parse("/products/"), Route::catalog());
        assert_eq!(
            Route::parse("/products/details/4"),
            Route::ProductDetail(ProductId::from(4))
        );
        assert_eq!(Route::parse("/add-product"), Route::AddProduct);
        assert_eq!(
            Route::parse("/edit-product/9"),
            Route::EditProduct(ProductId::from(9))
        );
    }

    #[test]
    fn category_segments_are_decoded() {
        assert_eq!(
            Route::parse("/products/category/men's%20clothing"),
            Route::category("men's clothing")
        );
        assert_eq!(
            Route::category("men's clothing").path(),
            "/products/category/men%27s%20clothing"
        );
        let route = Route::category("women's clothing");
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        for path in ["/nope", "/products/details", "/products/3", "/edit-product"] {
            assert!(Route::parse(path).is_not_found(), "{path}");
        }
        assert_eq!(Route::parse("/nope").path(), "/nope");
    }

    #[test]
    fn form_exits_map_to_routes() {
        assert_eq!(Route::from(FormExit::Reset), Route::AddProduct);
        assert_eq!(
            Route::from(FormExit::ShowDetail(ProductId::from(2))),
            Route::ProductDetail(ProductId::from(2))
        );
    }
}
