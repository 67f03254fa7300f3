// storefront-core: Product store, form lifecycles and views between
// storefront-api and its consumers (the CLI).

pub mod command;
pub mod config;
pub mod convert;
pub mod deletion;
pub mod error;
pub mod form;
pub mod gateway;
pub mod model;
pub mod router;
pub mod scope;
pub mod store;
pub mod storefront;
pub mod stream;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, MutationEvent};
pub use config::{DEFAULT_API_URL, StoreConfig, TlsVerification};
pub use deletion::{DeletionFlow, DeletionOutcome, DeletionPhase};
pub use error::{CoreError, FailureKind, FieldError, FormField, MutationKind, ValidationErrors};
pub use form::{
    FormExit, FormLifecycle, FormMode, FormPhase, FormResource, ImagePreview, ImageRef,
    PreviewRegistry, ProductDraft, ProductForm, StagedImage, SubmitOutcome,
};
pub use gateway::ProductGateway;
pub use router::Route;
pub use scope::ViewScope;
pub use store::{CatalogSnapshot, ProductStore, RefreshFailure};
pub use storefront::{ServiceState, Storefront};
pub use stream::ProductStream;
pub use view::{
    CartNotice, CatalogState, CatalogView, DetailSource, DetailView, HomeState, NavCategory,
    QuantityStepper,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    CategorySelection, Product, ProductId, ProductPayload, Rating, make_title_case,
};
