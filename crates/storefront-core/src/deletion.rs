// ── Product deletion flow ──
//
//   Idle ─► ConfirmPending ─► Deleting ─► Deleted ─► Idle (go to catalog)
//               │                 └─────► Idle + one-shot alert
//               └─► Idle (cancel, no request)

use tracing::{debug, warn};

use crate::command::{Command, CommandResult};
use crate::error::CoreError;
use crate::model::{Product, ProductId};

pub const DELETE_CONFIRMATION: &str = "Product deleted successfully.";

#[derive(Debug, Clone, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeletionPhase {
    #[default]
    Idle,
    ConfirmPending { id: ProductId, title: String },
    Deleting { id: ProductId, title: String },
    Deleted { id: ProductId },
}

/// Result of a finished delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted { message: String },
    Failed { alert: String },
}

/// Confirm-then-delete state machine for one product view.
#[derive(Debug, Default)]
pub struct DeletionFlow {
    phase: DeletionPhase,
    alert: Option<String>,
}

impl DeletionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DeletionPhase {
        &self.phase
    }

    /// Whether a delete request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, DeletionPhase::Deleting { .. })
    }

    /// Ask the user to confirm deleting `product`.
    pub fn request(&mut self, product: &Product) -> Result<(), CoreError> {
        match self.phase {
            DeletionPhase::Deleting { .. } | DeletionPhase::Deleted { .. } => {
                Err(CoreError::FlowBusy {
                    operation: "delete".into(),
                })
            }
            DeletionPhase::Idle | DeletionPhase::ConfirmPending { .. } => {
                self.phase = DeletionPhase::ConfirmPending {
                    id: product.id.clone(),
                    title: product.title.clone(),
                };
                Ok(())
            }
        }
    }

    /// Prompt text while confirmation is pending.
    pub fn prompt(&self) -> Option<String> {
        match &self.phase {
            DeletionPhase::ConfirmPending { title, .. } => {
                Some(format!("Continue to delete {}?", title.trim()))
            }
            _ => None,
        }
    }

    /// Back out of a pending confirmation. No request is made.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.phase, DeletionPhase::ConfirmPending { .. }) {
            self.phase = DeletionPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Confirm the pending deletion and return the command to dispatch.
    pub fn confirm(&mut self) -> Result<Command, CoreError> {
        match std::mem::take(&mut self.phase) {
            DeletionPhase::ConfirmPending { id, title } => {
                debug!(%id, "deleting product");
                self.phase = DeletionPhase::Deleting {
                    id: id.clone(),
                    title,
                };
                Ok(Command::DeleteProduct { id })
            }
            busy @ DeletionPhase::Deleting { .. } => {
                self.phase = busy;
                Err(CoreError::FlowBusy {
                    operation: "delete".into(),
                })
            }
            other => {
                let state = other.to_string();
                self.phase = other;
                Err(CoreError::InvalidTransition {
                    state,
                    action: "confirm a deletion".into(),
                })
            }
        }
    }

    /// Record the result of the command returned by `confirm`.
    pub fn complete(
        &mut self,
        result: Result<CommandResult, CoreError>,
    ) -> Result<DeletionOutcome, CoreError> {
        let DeletionPhase::Deleting { id, .. } = &self.phase else {
            return Err(CoreError::InvalidTransition {
                state: self.phase.to_string(),
                action: "complete a deletion".into(),
            });
        };
        let id = id.clone();

        match result {
            Ok(CommandResult::Deleted(deleted)) if deleted == id => {
                self.phase = DeletionPhase::Deleted { id };
                Ok(DeletionOutcome::Deleted {
                    message: DELETE_CONFIRMATION.into(),
                })
            }
            Ok(other) => {
                self.phase = DeletionPhase::Idle;
                Err(CoreError::Internal(format!(
                    "deletion of product {id} received a {} result for product {}",
                    other.kind(),
                    other.product_id()
                )))
            }
            Err(e) => {
                warn!(%id, error = %e, "delete failed");
                let alert = format!("Failed to delete product: {}", e.cause());
                self.phase = DeletionPhase::Idle;
                self.alert = Some(alert.clone());
                Ok(DeletionOutcome::Failed { alert })
            }
        }
    }

    /// Take the failure alert, if one is waiting. Shown once.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Leave `Deleted` after the confirmation has been shown.
    pub fn finish(&mut self) -> Result<ProductId, CoreError> {
        match std::mem::take(&mut self.phase) {
            DeletionPhase::Deleted { id } => Ok(id),
            other => {
                let state = other.to_string();
                self.phase = other;
                Err(CoreError::InvalidTransition {
                    state,
                    action: "finish a deletion".into(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MutationKind;
    use crate::testing::{mutation_error, product};

    fn pending() -> DeletionFlow {
        let mut p = product(3, "a");
        p.title = "  Mens Cotton Jacket ".into();
        let mut flow = DeletionFlow::new();
        flow.request(&p).unwrap();
        flow
    }

    #[test]
    fn prompt_shows_trimmed_title() {
        let flow = pending();
        assert_eq!(flow.prompt().unwrap(), "Continue to delete Mens Cotton Jacket?");
    }

    #[test]
    fn cancel_returns_to_idle_without_command() {
        let mut flow = pending();
        assert!(flow.cancel());
        assert_eq!(flow.phase(), &DeletionPhase::Idle);
        assert!(matches!(
            flow.confirm(),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn confirming_twice_is_rejected() {
        let mut flow = pending();
        let cmd = flow.confirm().unwrap();
        assert!(matches!(cmd, Command::DeleteProduct { ref id } if id.as_str() == "3"));
        assert!(flow.is_busy());
        assert!(matches!(flow.confirm(), Err(CoreError::FlowBusy { .. })));
        assert!(matches!(flow.request(&product(3, "a")), Err(CoreError::FlowBusy { .. })));
    }

    #[test]
    fn success_then_finish_yields_id() {
        let mut flow = pending();
        flow.confirm().unwrap();
        let outcome = flow
            .complete(Ok(CommandResult::Deleted(ProductId::from(3))))
            .unwrap();
        assert_eq!(
            outcome,
            DeletionOutcome::Deleted {
                message: "Product deleted successfully.".into()
            }
        );
        assert_eq!(flow.finish().unwrap().as_str(), "3");
        assert_eq!(flow.phase(), &DeletionPhase::Idle);
    }

    #[test]
    fn non_delete_result_is_not_a_deletion() {
        let mut flow = pending();
        flow.confirm().unwrap();
        let err = flow
            .complete(Ok(CommandResult::Updated(product(3, "a"))))
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
        assert_eq!(flow.phase(), &DeletionPhase::Idle);
        assert!(matches!(flow.finish(), Err(CoreError::InvalidTransition { .. })));

        let mut flow = pending();
        flow.confirm().unwrap();
        let err = flow
            .complete(Ok(CommandResult::Deleted(ProductId::from(9))))
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn failure_returns_to_idle_with_one_shot_alert() {
        let mut flow = pending();
        flow.confirm().unwrap();
        let outcome = flow
            .complete(Err(mutation_error(MutationKind::Delete, "gone fishing")))
            .unwrap();

        assert_eq!(
            outcome,
            DeletionOutcome::Failed {
                alert: "Failed to delete product: gone fishing".into()
            }
        );
        assert_eq!(flow.phase(), &DeletionPhase::Idle);
        assert_eq!(
            flow.take_alert().as_deref(),
            Some("Failed to delete product: gone fishing")
        );
        assert!(flow.take_alert().is_none());
    }
}
