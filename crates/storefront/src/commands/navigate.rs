//! Route-driven views: `home` and `open <path>`.

use std::future::Future;
use std::pin::Pin;

use storefront_core::view::LOADING_MESSAGE;
use storefront_core::{CatalogView, HomeState, Route, Storefront};

use crate::cli::{GlobalOpts, ProductFields};
use crate::error::CliError;
use crate::output;

use super::{form, products, util};

/// Show the featured product.
pub async fn home(storefront: &Storefront, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = util::spinner(global, LOADING_MESSAGE);
    let refreshed = storefront.refresh().await;
    pb.finish_and_clear();
    refreshed?;

    match storefront.home() {
        HomeState::Featured(product) => {
            output::status(global, "Featured product");
            let out = output::render_single(&global.output, &product, products::detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
        HomeState::Loading => {
            output::status(global, LOADING_MESSAGE);
            Ok(())
        }
        HomeState::Error(message) => Err(CliError::ApiError { message }),
    }
}

/// Resolve `path` to a route and render it.
pub async fn open(storefront: &Storefront, path: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let route = Route::parse(path);
    tracing::debug!(%route, "opening route");
    render(storefront, route, global).await
}

// Boxed: not-found redirects back into `render` for the home route.
fn render<'a>(
    storefront: &'a Storefront,
    route: Route,
    global: &'a GlobalOpts,
) -> Pin<Box<dyn Future<Output = Result<(), CliError>> + 'a>> {
    Box::pin(async move {
        match route {
            Route::Home => home(storefront, global).await,
            Route::Catalog { category } => {
                products::show_catalog(storefront, &CatalogView::new(category), global).await
            }
            Route::ProductDetail(id) => products::show_product(storefront, &id, global).await,
            Route::AddProduct => form::add(storefront, &ProductFields::default(), global).await,
            Route::EditProduct(id) => {
                form::edit(storefront, &id, &ProductFields::default(), global).await
            }
            Route::NotFound(path) => {
                output::warning(global, &format!("404 Page not found: {path}"));
                let scope = storefront.scope();
                let pb = util::spinner(global, "");
                let next = storefront
                    .not_found_redirect(&scope, |left| {
                        pb.set_message(format!(
                            "You'll be redirected to the homepage in {left}."
                        ));
                    })
                    .await;
                pb.finish_and_clear();
                render(storefront, next?, global).await
            }
        }
    })
}
