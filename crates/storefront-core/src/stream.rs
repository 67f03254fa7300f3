// ── Reactive snapshot stream ──
//
// Subscription type for consuming catalog changes from the ProductStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::CatalogSnapshot;

/// A subscription to the product catalog.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting into a `Stream`.
pub struct ProductStream {
    current: Arc<CatalogSnapshot>,
    receiver: watch::Receiver<Arc<CatalogSnapshot>>,
}

impl ProductStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<CatalogSnapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot seen at creation time or at the last `changed()`.
    pub fn current(&self) -> &Arc<CatalogSnapshot> {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<CatalogSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next applied snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<CatalogSnapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each applied snapshot, starting with the
/// current one.
pub struct SnapshotWatchStream {
    inner: WatchStream<Arc<CatalogSnapshot>>,
}

impl Stream for SnapshotWatchStream {
    type Item = Arc<CatalogSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
