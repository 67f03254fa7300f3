// ── ProductStore ──
//
// Refreshes are numbered with a monotonically increasing ticket. A
// result is only applied if its ticket is newer than the snapshot on
// display, so a slow response from a superseded refresh can never
// overwrite a later one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::snapshot::CatalogSnapshot;
use crate::error::CoreError;
use crate::gateway::ProductGateway;
use crate::model::{Product, ProductId};
use crate::stream::ProductStream;

/// The most recent refresh failure that was not superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    pub generation: u64,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Shared product cache with a generation-guarded refresh.
pub struct ProductStore {
    gateway: Arc<dyn ProductGateway>,
    snapshot: watch::Sender<Arc<CatalogSnapshot>>,
    last_error: watch::Sender<Option<RefreshFailure>>,
    tickets: AtomicU64,
}

impl ProductStore {
    pub fn new(gateway: Arc<dyn ProductGateway>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(CatalogSnapshot::default()));
        let (last_error, _) = watch::channel(None);
        Self {
            gateway,
            snapshot,
            last_error,
            tickets: AtomicU64::new(0),
        }
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch the full product list and replace the cache.
    ///
    /// Returns the snapshot that is authoritative once this call
    /// completes. If a newer refresh already landed, that newer snapshot
    /// is returned and this response is discarded. On failure the cache
    /// is left untouched and the error is recorded unless a newer
    /// refresh already superseded it.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, CoreError> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, "refreshing products");

        match self.gateway.list().await {
            Ok(products) => {
                let count = products.len();
                let snapshot = Arc::new(CatalogSnapshot::new(ticket, products));
                if self.apply_snapshot(Arc::clone(&snapshot)) {
                    self.clear_error_before(ticket);
                    info!(ticket, count, "product snapshot applied");
                    Ok(snapshot)
                } else {
                    warn!(ticket, "discarding stale product list");
                    Ok(self.current())
                }
            }
            Err(e) => {
                if self.record_error(ticket, &e) {
                    warn!(ticket, error = %e, "product refresh failed");
                } else {
                    debug!(ticket, error = %e, "ignoring failure of superseded refresh");
                }
                Err(e)
            }
        }
    }

    /// Replace the snapshot if `snapshot` is newer than the one on display.
    pub(crate) fn apply_snapshot(&self, snapshot: Arc<CatalogSnapshot>) -> bool {
        self.snapshot.send_if_modified(|current| {
            if snapshot.generation() > current.generation() {
                *current = snapshot;
                true
            } else {
                false
            }
        })
    }

    fn record_error(&self, ticket: u64, err: &CoreError) -> bool {
        if ticket <= self.snapshot.borrow().generation() {
            return false;
        }
        self.last_error.send_if_modified(|current| {
            if current.as_ref().is_some_and(|f| f.generation > ticket) {
                return false;
            }
            *current = Some(RefreshFailure {
                generation: ticket,
                message: err.to_string(),
                at: Utc::now(),
            });
            true
        })
    }

    fn clear_error_before(&self, ticket: u64) {
        self.last_error.send_if_modified(|current| {
            if current.as_ref().is_some_and(|f| f.generation < ticket) {
                *current = None;
                true
            } else {
                false
            }
        });
    }

    // ── Readers ──────────────────────────────────────────────────────

    /// The snapshot on display (empty before the first load).
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn find(&self, id: &ProductId) -> Option<Product> {
        self.snapshot.borrow().find(id).cloned()
    }

    pub fn categories(&self) -> Vec<String> {
        self.snapshot.borrow().categories().to_vec()
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    pub fn last_error(&self) -> Option<RefreshFailure> {
        self.last_error.borrow().clone()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.snapshot.borrow().fetched_at()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> ProductStream {
        ProductStream::new(self.snapshot.subscribe())
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<RefreshFailure>> {
        self.last_error.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::oneshot;

    use super::ProductStore;
    use crate::error::CoreError;
    use crate::testing::{ScriptedGateway, fetch_error, product, wait_until};

    #[tokio::test]
    async fn refresh_replaces_the_cache() {
        let gateway = Arc::new(ScriptedGateway::with_products(vec![
            product(1, "electronics"),
            product(2, "jewelery"),
        ]));
        let store = ProductStore::new(gateway.clone());
        assert!(store.is_empty());
        assert!(store.last_refresh().is_none());

        let snapshot = store.refresh().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.categories(), vec!["electronics", "jewelery"]);
        assert!(store.last_refresh().is_some());
    }

    #[tokio::test]
    async fn late_response_of_older_refresh_is_discarded() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (release_first, gate) = oneshot::channel();
        gateway.script_list(Ok(vec![product(1, "a")]), Some(gate));
        gateway.script_list(Ok(vec![product(1, "a"), product(2, "b")]), None);
        let store = Arc::new(ProductStore::new(gateway.clone()));

        let older = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh().await })
        };
        wait_until("first list request", || gateway.list_calls() >= 1).await;

        let newer = store.refresh().await.unwrap();
        assert_eq!(newer.generation(), 2);
        assert_eq!(store.len(), 2);

        release_first.send(()).unwrap();
        let returned = older.await.unwrap().unwrap();

        assert_eq!(store.len(), 2, "stale list must not overwrite the newer one");
        assert_eq!(store.current().generation(), 2);
        assert_eq!(returned.generation(), 2);
    }

    #[tokio::test]
    async fn failure_keeps_cache_and_records_error() {
        let gateway = Arc::new(ScriptedGateway::with_products(vec![product(1, "a")]));
        let store = ProductStore::new(gateway.clone());
        store.refresh().await.unwrap();

        gateway.script_list(Err(fetch_error("offline")), None);
        let err = store.refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::Fetch { .. }));
        assert_eq!(store.len(), 1);

        let failure = store.last_error().unwrap();
        assert_eq!(failure.generation, 2);
        assert!(failure.message.contains("offline"));

        store.refresh().await.unwrap();
        assert!(store.last_error().is_none(), "a newer success clears the error");
    }

    #[tokio::test]
    async fn failure_of_superseded_refresh_is_not_recorded() {
        let gateway = Arc::new(ScriptedGateway::default());
        let (release_first, gate) = oneshot::channel();
        gateway.script_list(Err(fetch_error("slow failure")), Some(gate));
        gateway.script_list(Ok(vec![product(1, "a")]), None);
        let store = Arc::new(ProductStore::new(gateway.clone()));

        let older = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh().await })
        };
        wait_until("first list request", || gateway.list_calls() >= 1).await;
        store.refresh().await.unwrap();

        release_first.send(()).unwrap();
        assert!(older.await.unwrap().is_err());
        assert!(store.last_error().is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_new_snapshots() {
        let gateway = Arc::new(ScriptedGateway::with_products(vec![product(1, "a")]));
        let store = ProductStore::new(gateway);
        let mut stream = store.subscribe();
        assert!(stream.current().is_empty());

        store.refresh().await.unwrap();
        let next = stream.changed().await.unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(stream.current().generation(), 1);
    }
}
