//! Product command handlers.

use tabled::Tabled;

use storefront_core::view::LOADING_MESSAGE;
use storefront_core::{
    CatalogState, CatalogView, DeletionFlow, DeletionOutcome, NavCategory, Product, ProductId,
    Route, Storefront,
};

use crate::cli::{GlobalOpts, OutputFormat, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::{form, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.to_string(),
            title: truncate(p.display_title(), 48),
            price: p.price_display(),
            category: p.category.clone(),
            rating: p
                .rating
                .map_or_else(|| "-".into(), |r| format!("{:.1} ({})", r.rate, r.count)),
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Path")]
    path: String,
}

impl From<&NavCategory> for CategoryRow {
    fn from(c: &NavCategory) -> Self {
        Self {
            category: c.category.clone(),
            label: c.label.clone(),
            path: c.path.clone(),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

pub(crate) fn detail(p: &Product) -> String {
    util::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Title", p.display_title().to_owned()),
        ("Price", p.price_display()),
        ("Category", p.category.clone()),
        (
            "Rating",
            p.rating
                .map_or_else(|| "-".into(), |r| format!("{:.1} ({} reviews)", r.rate, r.count)),
        ),
        ("Image", p.image.clone()),
        ("Description", p.description.clone()),
    ])
}

// ── Shared views ────────────────────────────────────────────────────

/// Load the catalog and print `view` of it.
pub(crate) async fn show_catalog(
    storefront: &Storefront,
    view: &CatalogView,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pb = util::spinner(global, LOADING_MESSAGE);
    let refreshed = storefront.refresh().await;
    pb.finish_and_clear();
    refreshed?;

    if matches!(global.output, OutputFormat::Table) {
        let trail = view
            .breadcrumbs()
            .iter()
            .map(|crumb| crumb.label.clone())
            .collect::<Vec<_>>()
            .join(" / ");
        output::status(global, &trail);
    }

    match storefront.catalog(view) {
        CatalogState::Populated(products) => {
            let out = output::render_list(
                &global.output,
                &products,
                |p| ProductRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
        CatalogState::Loading => {
            output::status(global, LOADING_MESSAGE);
            Ok(())
        }
        CatalogState::Error(message) => Err(CliError::ApiError { message }),
    }
}

/// Resolve and print one product.
pub(crate) async fn show_product(
    storefront: &Storefront,
    id: &ProductId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scope = storefront.scope();
    let view = storefront.product_detail(id, &scope).await?;
    tracing::debug!(source = ?view.source, "product resolved");
    let out = output::render_single(&global.output, &view.product, detail, |p| p.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    storefront: &Storefront,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProductsCommand::List { category } => {
            show_catalog(storefront, &CatalogView::new(category), global).await
        }

        ProductsCommand::Get { id } => show_product(storefront, &ProductId::from(id), global).await,

        ProductsCommand::Categories => {
            let pb = util::spinner(global, LOADING_MESSAGE);
            let refreshed = storefront.refresh().await;
            pb.finish_and_clear();
            refreshed?;

            let categories = storefront.nav_categories();
            let out = output::render_list(
                &global.output,
                &categories,
                |c| CategoryRow::from(c),
                |c| c.category.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Add(fields) => form::add(storefront, &fields, global).await,

        ProductsCommand::Edit { id, fields } => {
            form::edit(storefront, &ProductId::from(id), &fields, global).await
        }

        ProductsCommand::Delete { id } => delete(storefront, &ProductId::from(id), global).await,
    }
}

async fn delete(storefront: &Storefront, id: &ProductId, global: &GlobalOpts) -> Result<(), CliError> {
    let scope = storefront.scope();
    let product = storefront.product_detail(id, &scope).await?.product;

    let mut flow = DeletionFlow::new();
    flow.request(&product)?;
    let prompt = flow.prompt().unwrap_or_default();
    if !util::confirm(&prompt, global.yes)? {
        flow.cancel();
        output::status(global, "Deletion cancelled.");
        return Ok(());
    }

    let pb = util::spinner(global, format!("Deleting {}...", product.display_title()));
    let outcome = storefront.confirm_deletion(&mut flow, &scope).await;
    pb.finish_and_clear();

    match outcome? {
        DeletionOutcome::Deleted { message } => {
            output::success(global, &message);
            let next = if util::is_interactive() && !global.quiet {
                let pb = util::spinner(global, message);
                let next = storefront.settle_deletion(&mut flow, &scope).await;
                pb.finish_and_clear();
                next?
            } else {
                flow.finish()?;
                Route::catalog()
            };
            output::status(global, &format!("Next: {next}"));
            Ok(())
        }
        DeletionOutcome::Failed { alert } => Err(CliError::DeletionFailed {
            alert: flow.take_alert().unwrap_or(alert),
        }),
    }
}
