//! Add and edit form flows.
//!
//! Flags fill the draft first. On a terminal, missing fields are then
//! prompted for (all fields, seeded with current values, when editing
//! without flags). Submission failures offer a retry; declining with
//! unsaved changes asks before leaving.

use std::path::Path;

use dialoguer::{Input, Select};

use storefront_core::form::{ACCEPTED_IMAGE_EXTENSIONS, DESCRIPTION_MAX_CHARS, is_price_input};
use storefront_core::model::OTHER_CATEGORY;
use storefront_core::{
    CategorySelection, ProductDraft, ProductForm, ProductId, Route, StagedImage, Storefront,
    SubmitOutcome, make_title_case,
};

use crate::cli::{GlobalOpts, ProductFields};
use crate::error::CliError;
use crate::output;

use super::{products, util};

// ── Entry points ────────────────────────────────────────────────────

pub async fn add(
    storefront: &Storefront,
    fields: &ProductFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut form = storefront.add_form();
    apply_fields(storefront, &mut form, fields, global).await?;
    if util::is_interactive() {
        prompt_fields(storefront, &mut form, global, false).await?;
    }
    submit(storefront, form, global).await
}

pub async fn edit(
    storefront: &Storefront,
    id: &ProductId,
    fields: &ProductFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scope = storefront.scope();
    let pb = util::spinner(global, "Loading product...");
    let loaded = storefront.edit_form(id, &scope).await;
    pb.finish_and_clear();
    let mut form = loaded?;

    apply_fields(storefront, &mut form, fields, global).await?;
    if fields.is_empty() && util::is_interactive() {
        prompt_fields(storefront, &mut form, global, true).await?;
    }
    submit(storefront, form, global).await
}

// ── Field application ───────────────────────────────────────────────

async fn apply_fields(
    storefront: &Storefront,
    form: &mut ProductForm,
    fields: &ProductFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(ref title) = fields.title {
        form.update(|d| d.set_title(title))?;
    }
    if let Some(ref price) = fields.price {
        set_price(form, price)?;
    }
    if let Some(ref description) = fields.description {
        set_description(form, description, global)?;
    }
    if let Some(ref category) = fields.category {
        form.update(|d| d.select_category(category))?;
    }
    if let Some(ref custom) = fields.custom_category {
        form.update(|d| d.set_custom_category(custom))?;
    }
    if let Some(ref path) = fields.image {
        stage_image(storefront, form, path, global).await?;
    }
    Ok(())
}

fn set_price(form: &mut ProductForm, text: &str) -> Result<(), CliError> {
    let text = text.trim();
    if !is_price_input(text) {
        return Err(CliError::Validation {
            field: "price".into(),
            reason: format!("'{text}' is not a price; use digits with at most two decimals"),
        });
    }
    form.update(|d| d.input_price(text))?;
    form.update(ProductDraft::blur_price)?;
    Ok(())
}

fn set_description(
    form: &mut ProductForm,
    text: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if text.chars().count() > DESCRIPTION_MAX_CHARS {
        output::warning(
            global,
            &format!("Description truncated to {DESCRIPTION_MAX_CHARS} characters."),
        );
    }
    form.update(|d| d.set_description(text))?;
    Ok(())
}

async fn stage_image(
    storefront: &Storefront,
    form: &mut ProductForm,
    path: &Path,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let image = StagedImage::load(path).await?;
    form.update(|d| d.select_image(image, storefront.previews()))?;
    if let Some(preview) = form.draft().preview() {
        output::status(global, &format!("Preview: {}", preview.location()));
    }
    Ok(())
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Prompt for missing fields, or every field when `all`.
async fn prompt_fields(
    storefront: &Storefront,
    form: &mut ProductForm,
    global: &GlobalOpts,
    all: bool,
) -> Result<(), CliError> {
    if all || form.draft().title().trim().is_empty() {
        let title: String = Input::new()
            .with_prompt("Product Name")
            .with_initial_text(form.draft().title())
            .interact_text()
            .map_err(CliError::prompt)?;
        form.update(|d| d.set_title(&title))?;
    }

    if all || form.draft().resolved_category().is_none() {
        prompt_category(storefront, form, global).await?;
    }

    if all || form.draft().description().trim().is_empty() {
        let description: String = Input::new()
            .with_prompt(format!("Product Description (max {DESCRIPTION_MAX_CHARS})"))
            .with_initial_text(form.draft().description())
            .interact_text()
            .map_err(CliError::prompt)?;
        set_description(form, &description, global)?;
    }

    if all || form.draft().price().parse().is_none() {
        let price: String = Input::new()
            .with_prompt("Price")
            .with_initial_text(form.draft().price().as_str())
            .validate_with(|text: &String| {
                let text = text.trim();
                if !text.is_empty() && is_price_input(text) {
                    Ok(())
                } else {
                    Err("Enter a price like 19.99")
                }
            })
            .interact_text()
            .map_err(CliError::prompt)?;
        set_price(form, &price)?;
    }

    let editing = !form.mode().is_create();
    if all || (form.draft().image().is_none() && !editing) {
        prompt_image(storefront, form, global, editing).await?;
    }
    Ok(())
}

async fn prompt_category(
    storefront: &Storefront,
    form: &mut ProductForm,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pb = util::spinner(global, "Loading categories...");
    let refreshed = storefront.refresh().await;
    pb.finish_and_clear();
    if let Err(e) = refreshed {
        output::warning(global, &format!("Could not load categories: {}", e.cause()));
    }

    let categories = storefront.store().categories();
    let mut items: Vec<String> = categories.iter().map(|c| make_title_case(c)).collect();
    items.push("Other".into());

    let current = match form.draft().category() {
        CategorySelection::Known(name) => categories.iter().position(|c| c == name),
        CategorySelection::Other => Some(categories.len()),
        CategorySelection::Unselected => None,
    };

    let choice = Select::new()
        .with_prompt("Select category")
        .items(&items)
        .default(current.unwrap_or(0))
        .interact()
        .map_err(CliError::prompt)?;
    let value = categories.get(choice).map_or(OTHER_CATEGORY, String::as_str);
    form.update(|d| d.select_category(value))?;

    if form.draft().category().is_other() {
        let custom: String = Input::new()
            .with_prompt("Enter Custom Category")
            .with_initial_text(form.draft().custom_category())
            .interact_text()
            .map_err(CliError::prompt)?;
        form.update(|d| d.set_custom_category(&custom))?;
    }
    Ok(())
}

async fn prompt_image(
    storefront: &Storefront,
    form: &mut ProductForm,
    global: &GlobalOpts,
    optional: bool,
) -> Result<(), CliError> {
    let accepted = ACCEPTED_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ");
    let prompt = if optional {
        format!("Upload product image ({accepted}; empty keeps the current one)")
    } else {
        format!("Upload product image ({accepted})")
    };

    loop {
        let path: String = Input::new()
            .with_prompt(&prompt)
            .allow_empty(optional)
            .interact_text()
            .map_err(CliError::prompt)?;
        let path = path.trim();
        if path.is_empty() {
            return Ok(());
        }
        match stage_image(storefront, form, Path::new(path), global).await {
            Ok(()) => return Ok(()),
            Err(e) => output::warning(global, &e.to_string()),
        }
    }
}

// ── Submission ──────────────────────────────────────────────────────

async fn submit(
    storefront: &Storefront,
    mut form: ProductForm,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let scope = storefront.scope();

    loop {
        let pb = util::spinner(global, "Submitting...");
        let outcome = storefront.submit_form(&mut form, &scope).await;
        pb.finish_and_clear();

        match outcome? {
            SubmitOutcome::Confirmed {
                message,
                output: product,
            } => {
                output::success(global, &message);
                let out = output::render_single(&global.output, &product, products::detail, |p| {
                    p.id.to_string()
                });
                output::print_output(&out, global.quiet);

                let exit = if util::is_interactive() && !global.quiet {
                    let pb = util::spinner(global, message);
                    let exit = storefront.settle_form(&mut form, &scope).await;
                    pb.finish_and_clear();
                    exit?
                } else {
                    form.finish_confirmation()?
                };
                output::status(global, &format!("Next: {}", Route::from(exit)));
                return Ok(());
            }
            SubmitOutcome::Failed { message } => {
                if !util::is_interactive() {
                    return Err(CliError::SubmissionFailed { message });
                }
                output::warning(global, &message);
                form.dismiss_error();

                let mut retry = util::ask("Try again?", true)?;
                loop {
                    match after_failure(&form, retry, || {
                        util::ask("You have unsaved changes. Leave anyway?", false)
                            .unwrap_or(true)
                    }) {
                        NextStep::Submit => break,
                        NextStep::Leave => return Err(CliError::SubmissionFailed { message }),
                        NextStep::Edit => {
                            prompt_fields(storefront, &mut form, global, true).await?;
                            retry = util::ask("Submit the product?", true)?;
                        }
                    }
                }
            }
        }
    }
}

/// What the user chose after a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextStep {
    Submit,
    Edit,
    Leave,
}

/// Resubmit only on an explicit yes. Declining offers to leave, and
/// staying on a form with unsaved changes goes back to editing.
fn after_failure(form: &ProductForm, submit: bool, ask_leave: impl FnOnce() -> bool) -> NextStep {
    if submit {
        NextStep::Submit
    } else if form.confirm_leave(ask_leave) {
        NextStep::Leave
    } else {
        NextStep::Edit
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storefront_core::ProductForm;

    use super::{NextStep, after_failure};

    fn dirty_form() -> ProductForm {
        let mut form = ProductForm::create();
        form.update(|d| d.set_title("Desk Lamp")).unwrap();
        form
    }

    #[test]
    fn declining_both_questions_returns_to_editing() {
        let form = dirty_form();
        assert_eq!(after_failure(&form, false, || false), NextStep::Edit);
    }

    #[test]
    fn only_an_explicit_yes_resubmits() {
        let form = dirty_form();
        assert_eq!(after_failure(&form, true, || false), NextStep::Submit);
        assert_eq!(after_failure(&form, false, || true), NextStep::Leave);
    }

    #[test]
    fn untouched_form_leaves_without_asking() {
        let form = ProductForm::create();
        let step = after_failure(&form, false, || panic!("should not ask"));
        assert_eq!(step, NextStep::Leave);
    }
}
