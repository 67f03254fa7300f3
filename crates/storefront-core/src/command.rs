// ── Command API ──
//
// All product mutations flow through one `Command` enum. The storefront's
// command processor executes them against the gateway, so a mutation
// outlives the view that issued it.

use serde::Serialize;

use crate::error::{CoreError, MutationKind};
use crate::model::{Product, ProductId, ProductPayload};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// Every write operation against the product API.
#[derive(Debug, Clone)]
pub enum Command {
    CreateProduct(ProductPayload),
    UpdateProduct {
        id: ProductId,
        payload: ProductPayload,
    },
    DeleteProduct {
        id: ProductId,
    },
}

impl Command {
    pub fn kind(&self) -> MutationKind {
        match self {
            Command::CreateProduct(_) => MutationKind::Create,
            Command::UpdateProduct { .. } => MutationKind::Update,
            Command::DeleteProduct { .. } => MutationKind::Delete,
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", content = "product", rename_all = "snake_case")]
pub enum CommandResult {
    Created(Product),
    Updated(Product),
    Deleted(ProductId),
}

impl CommandResult {
    pub fn kind(&self) -> MutationKind {
        match self {
            CommandResult::Created(_) => MutationKind::Create,
            CommandResult::Updated(_) => MutationKind::Update,
            CommandResult::Deleted(_) => MutationKind::Delete,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        match self {
            CommandResult::Created(p) | CommandResult::Updated(p) => &p.id,
            CommandResult::Deleted(id) => id,
        }
    }
}

/// Broadcast to every subscriber after a command succeeds.
pub type MutationEvent = CommandResult;
