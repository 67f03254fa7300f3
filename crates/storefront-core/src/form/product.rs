// ── Product form ──

use super::image::{ImagePreview, ImageRef, PreviewRegistry, StagedImage};
use super::lifecycle::{FormLifecycle, FormMode, FormResource};
use super::price::PriceBuffer;
use crate::command::{Command, CommandResult};
use crate::error::{CoreError, FormField, ValidationErrors};
use crate::model::{CategorySelection, Product, ProductId, ProductPayload};

/// Longest description the form keeps.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Field state of one open product form.
#[derive(Debug, Default)]
pub struct ProductDraft {
    title: String,
    price: PriceBuffer,
    description: String,
    category: CategorySelection,
    custom_category: String,
    image: Option<ImageRef>,
    preview: Option<ImagePreview>,
}

impl ProductDraft {
    /// Draft seeded from an existing product for editing.
    pub fn from_product(product: &Product) -> Self {
        let has_image = !product.image.is_empty();
        Self {
            title: product.title.clone(),
            price: PriceBuffer::from_amount(product.price),
            description: truncate_chars(&product.description, DESCRIPTION_MAX_CHARS),
            category: CategorySelection::Known(product.category.clone()),
            custom_category: String::new(),
            image: has_image.then(|| ImageRef::Remote(product.image.clone())),
            preview: has_image.then(|| ImagePreview::Remote(product.image.clone())),
        }
    }

    // ── Fields ───────────────────────────────────────────────────────

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) -> bool {
        replace(&mut self.title, title)
    }

    pub fn price(&self) -> &PriceBuffer {
        &self.price
    }

    pub fn input_price(&mut self, text: &str) -> bool {
        self.price.input(text)
    }

    pub fn blur_price(&mut self) -> bool {
        self.price.blur()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the description, cut to [`DESCRIPTION_MAX_CHARS`].
    pub fn set_description(&mut self, text: &str) -> bool {
        let text = truncate_chars(text, DESCRIPTION_MAX_CHARS);
        replace(&mut self.description, &text)
    }

    /// `"n/500"` character counter.
    pub fn description_counter(&self) -> String {
        format!(
            "{}/{DESCRIPTION_MAX_CHARS}",
            self.description.chars().count()
        )
    }

    pub fn category(&self) -> &CategorySelection {
        &self.category
    }

    /// Select a picker value; `"other"` enables the custom category.
    pub fn select_category(&mut self, choice: &str) -> bool {
        let selection = CategorySelection::from_choice(choice);
        if selection == self.category {
            return false;
        }
        self.category = selection;
        true
    }

    pub fn custom_category(&self) -> &str {
        &self.custom_category
    }

    pub fn set_custom_category(&mut self, text: &str) -> bool {
        replace(&mut self.custom_category, text)
    }

    /// The category that will be submitted, if one is chosen.
    pub fn resolved_category(&self) -> Option<&str> {
        match &self.category {
            CategorySelection::Unselected => None,
            CategorySelection::Known(c) => Some(c.as_str()).filter(|c| !c.trim().is_empty()),
            CategorySelection::Other => {
                Some(self.custom_category.trim()).filter(|c| !c.is_empty())
            }
        }
    }

    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    /// Stage a new image. The previous preview handle is released.
    pub fn select_image(&mut self, image: StagedImage, previews: &PreviewRegistry) -> bool {
        self.preview = Some(ImagePreview::Local(previews.open(&image)));
        self.image = Some(ImageRef::Staged(image));
        true
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Check required fields and build the payload to submit.
    ///
    /// The image is required unless `existing_image_ok`, in which case
    /// an absent image submits the product's current one.
    pub fn validate(&self, existing_image_ok: bool) -> Result<ProductPayload, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.push(FormField::Title, "Product name is required.");
        }
        let price = self.price.parse();
        if price.is_none() {
            errors.push(FormField::Price, "Enter a valid price.");
        }
        if self.description.trim().is_empty() {
            errors.push(FormField::Description, "Description is required.");
        }
        if self.resolved_category().is_none() {
            if self.category.is_other() {
                errors.push(FormField::CustomCategory, "Enter a custom category.");
            } else {
                errors.push(FormField::Category, "Select a category.");
            }
        }
        if self.image.is_none() && !existing_image_ok {
            errors.push(FormField::Image, "Upload a product image.");
        }

        errors.into_result()?;

        Ok(ProductPayload {
            title: self.title.clone(),
            price: price.unwrap_or_default(),
            description: self.description.clone(),
            category: self.resolved_category().unwrap_or_default().to_owned(),
            image: self
                .image
                .as_ref()
                .map(ImageRef::to_submission)
                .unwrap_or_default(),
        })
    }
}

fn replace(field: &mut String, value: &str) -> bool {
    if field == value {
        return false;
    }
    value.clone_into(field);
    true
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Product binding for [`FormLifecycle`].
#[derive(Debug, Clone, Copy)]
pub struct ProductResource;

impl FormResource for ProductResource {
    type Key = ProductId;
    type Draft = ProductDraft;
    type Output = Product;

    const NOUN: &'static str = "Product";

    fn to_command(draft: &ProductDraft, mode: &FormMode<ProductId>) -> Result<Command, ValidationErrors> {
        let payload = draft.validate(!mode.is_create())?;
        Ok(match mode {
            FormMode::Create => Command::CreateProduct(payload),
            FormMode::Edit(id) => Command::UpdateProduct {
                id: id.clone(),
                payload,
            },
        })
    }

    fn accept(result: CommandResult) -> Result<Product, CoreError> {
        match result {
            CommandResult::Created(p) | CommandResult::Updated(p) => Ok(p),
            CommandResult::Deleted(id) => Err(CoreError::Internal(format!(
                "form received a delete result for product {id}"
            ))),
        }
    }
}

/// The create/edit form for products.
pub type ProductForm = FormLifecycle<ProductResource>;
