// ── Form lifecycles ──
//
// One generic create/edit state machine (`FormLifecycle`) parameterized
// by the resource it edits, plus the product-specific draft, price
// buffer and image staging it is instantiated with.

mod image;
mod lifecycle;
mod price;
mod product;

pub use image::{
    ACCEPTED_IMAGE_EXTENSIONS, ImagePreview, ImageRef, PreviewHandle, PreviewRegistry,
    StagedImage,
};
pub use lifecycle::{FormExit, FormLifecycle, FormMode, FormPhase, FormResource, SubmitOutcome};
pub use price::{PriceBuffer, is_price_input};
pub use product::{DESCRIPTION_MAX_CHARS, ProductDraft, ProductForm, ProductResource};
