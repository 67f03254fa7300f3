// ── View scopes ──
//
// Each open view owns a `ViewScope`, a child of the storefront's root
// cancellation token. Dropping or disposing the scope cancels its timers
// and makes late results bounce off with `CoreError::Disposed` instead of
// touching the departed view. Requests that were already handed to the
// command processor keep running.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::CoreError;

#[derive(Debug)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub(crate) fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// A scope with no parent, for callers without a storefront.
    pub fn detached() -> Self {
        Self::new(CancellationToken::new())
    }

    /// A nested scope, disposed together with this one.
    pub fn child(&self) -> Self {
        Self::new(self.token.child_token())
    }

    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn dispose(&self) {
        self.token.cancel();
    }

    /// Resolve once the scope has been disposed.
    pub async fn disposed(&self) {
        self.token.cancelled().await;
    }

    /// Await `fut` unless the scope is disposed first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, CoreError> {
        if self.is_disposed() {
            return Err(CoreError::Disposed);
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!("dropping result for disposed view");
                Err(CoreError::Disposed)
            }
            out = fut => {
                if self.is_disposed() {
                    debug!("dropping result for disposed view");
                    Err(CoreError::Disposed)
                } else {
                    Ok(out)
                }
            }
        }
    }

    /// Sleep for `delay`, cut short by disposal.
    pub async fn sleep(&self, delay: Duration) -> Result<(), CoreError> {
        self.guard(tokio::time::sleep(delay)).await
    }

    /// Count down whole seconds from `total`, calling `on_tick` with the
    /// seconds remaining before each one-second wait.
    pub async fn countdown(
        &self,
        total: Duration,
        mut on_tick: impl FnMut(u64) + Send,
    ) -> Result<(), CoreError> {
        let mut remaining = total.as_secs();
        while remaining > 0 {
            on_tick(remaining);
            self.sleep(Duration::from_secs(1)).await?;
            remaining -= 1;
        }
        Ok(())
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
