//! Command dispatch: bridges CLI args -> storefront flows -> output formatting.

pub mod cart;
pub mod config_cmd;
pub mod form;
pub mod navigate;
pub mod products;
pub mod util;

use storefront_core::Storefront;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    storefront: &Storefront,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Products(args) => products::handle(storefront, args, global).await,
        Command::Cart(args) => cart::handle(storefront, args, global).await,
        Command::Home => navigate::home(storefront, global).await,
        Command::Open { path } => navigate::open(storefront, &path, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
