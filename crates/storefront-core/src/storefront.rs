// ── Storefront facade ──
//
// Root handle for one storefront session. Owns the gateway, the product
// store and the command processor that executes mutations. Views and
// flows get a `ViewScope` from here; mutations they dispatch run to
// completion on the processor even if the scope goes away first.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use storefront_api::{ProductClient, TlsMode, TransportConfig};

use crate::command::{Command, CommandEnvelope, CommandResult, MutationEvent};
use crate::config::{StoreConfig, TlsVerification};
use crate::deletion::{DeletionFlow, DeletionOutcome};
use crate::error::CoreError;
use crate::form::{
    FormExit, FormLifecycle, FormResource, PreviewRegistry, ProductDraft, ProductForm,
    SubmitOutcome,
};
use crate::gateway::ProductGateway;
use crate::model::ProductId;
use crate::router::Route;
use crate::scope::ViewScope;
use crate::store::{CatalogSnapshot, ProductStore};
use crate::view::{CatalogState, CatalogView, DetailView, HomeState, HomeView, NavCategory};

const COMMAND_CHANNEL_SIZE: usize = 16;
const EVENT_CHANNEL_SIZE: usize = 64;

/// Whether the command processor is accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ServiceState {
    Stopped,
    Running,
}

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<StorefrontInner>`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StoreConfig,
    gateway: Arc<dyn ProductGateway>,
    store: Arc<ProductStore>,
    previews: PreviewRegistry,
    state: watch::Sender<ServiceState>,
    event_tx: broadcast::Sender<MutationEvent>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Storefront {
    /// Create a storefront talking to the API in `config`. Does NOT
    /// start the command processor; call [`start()`](Self::start).
    pub fn new(config: StoreConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client =
            ProductClient::new(config.api_url.as_str(), &transport).map_err(|e| {
                CoreError::Config {
                    message: e.to_string(),
                }
            })?;
        Ok(Self::with_gateway(config, Arc::new(client)))
    }

    /// Create a storefront over any gateway implementation.
    pub fn with_gateway(config: StoreConfig, gateway: Arc<dyn ProductGateway>) -> Self {
        let store = Arc::new(ProductStore::new(Arc::clone(&gateway)));
        let (state, _) = watch::channel(ServiceState::Stopped);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                gateway,
                store,
                previews: PreviewRegistry::new(),
                state,
                event_tx,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<ProductStore> {
        &self.inner.store
    }

    /// Registry backing the image previews of forms opened here.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.inner.previews
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the command processor.
    pub async fn start(&self) -> Result<(), CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::ServiceStopped);
        }
        let Some(rx) = self.inner.command_rx.lock().await.take() else {
            debug!("command processor already running");
            return Ok(());
        };

        let storefront = self.clone();
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(command_processor_task(storefront, rx)));

        self.inner.state.send_replace(ServiceState::Running);
        debug!("storefront started");
        Ok(())
    }

    /// Stop the command processor, dispose every view scope, and join
    /// background tasks. A command already executing finishes first.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.state.send_replace(ServiceState::Stopped);

        // The processor may still push a refresh handle while finishing
        // its last command, so join until nothing new appears.
        loop {
            let handles = std::mem::take(&mut *self.inner.task_handles.lock().await);
            if handles.is_empty() {
                break;
            }
            for handle in handles {
                let _ = handle.await;
            }
        }
        debug!("storefront stopped");
    }

    /// One-shot: start, run closure, shut down.
    pub async fn oneshot<F, Fut, T>(config: StoreConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Storefront) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let storefront = Storefront::new(config)?;
        storefront.start().await?;
        let result = f(storefront.clone()).await;
        storefront.shutdown().await;
        result
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> watch::Receiver<ServiceState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to successful mutations.
    pub fn events(&self) -> broadcast::Receiver<MutationEvent> {
        self.inner.event_tx.subscribe()
    }

    /// A fresh scope for a view opened now.
    pub fn scope(&self) -> ViewScope {
        ViewScope::new(self.inner.cancel.child_token())
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Reload the product list.
    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, CoreError> {
        self.inner.store.refresh().await
    }

    pub fn catalog(&self, view: &CatalogView) -> CatalogState {
        let store = &self.inner.store;
        view.render(&store.current(), store.last_error().as_ref())
    }

    pub fn home(&self) -> HomeState {
        let store = &self.inner.store;
        HomeView::render(&store.current(), store.last_error().as_ref())
    }

    pub fn nav_categories(&self) -> Vec<NavCategory> {
        crate::view::nav_categories(&self.inner.store.current())
    }

    /// Resolve a product for its detail view: from the loaded catalog
    /// when present, otherwise with one get-by-id request.
    pub async fn product_detail(
        &self,
        id: &ProductId,
        scope: &ViewScope,
    ) -> Result<DetailView, CoreError> {
        if let Some(view) = DetailView::from_cache(&self.inner.store.current(), id) {
            debug!(%id, "detail served from catalog");
            return Ok(view);
        }
        let product = scope.guard(self.inner.gateway.get(id)).await??;
        Ok(DetailView::fetched(product))
    }

    // ── Forms ────────────────────────────────────────────────────────

    pub fn add_form(&self) -> ProductForm {
        ProductForm::create()
    }

    /// Open an edit form seeded from the server's copy of `id`.
    pub async fn edit_form(&self, id: &ProductId, scope: &ViewScope) -> Result<ProductForm, CoreError> {
        let product = scope.guard(self.inner.gateway.get(id)).await??;
        Ok(ProductForm::edit(id.clone(), ProductDraft::from_product(&product)))
    }

    /// Validate and submit `form`, then record the outcome on it.
    ///
    /// Returns `Validation` without dispatching anything if the draft is
    /// incomplete, and `Disposed` (leaving `form` untouched) if `scope`
    /// goes away before the result arrives.
    pub async fn submit_form<R>(
        &self,
        form: &mut FormLifecycle<R>,
        scope: &ViewScope,
    ) -> Result<SubmitOutcome<R::Output>, CoreError>
    where
        R: FormResource,
        FormLifecycle<R>: Send,
    {
        let command = form.begin_submit()?;
        let result = scope.guard(self.execute(command)).await?;
        form.complete(result)
    }

    /// Hold the confirmation for the configured delay, then move on.
    pub async fn settle_form<R>(
        &self,
        form: &mut FormLifecycle<R>,
        scope: &ViewScope,
    ) -> Result<FormExit<R::Key>, CoreError>
    where
        R: FormResource,
        FormLifecycle<R>: Send,
    {
        scope.sleep(self.inner.config.confirmation_delay).await?;
        form.finish_confirmation()
    }

    // ── Deletion ─────────────────────────────────────────────────────

    pub async fn confirm_deletion(
        &self,
        flow: &mut DeletionFlow,
        scope: &ViewScope,
    ) -> Result<DeletionOutcome, CoreError> {
        let command = flow.confirm()?;
        let result = scope.guard(self.execute(command)).await?;
        flow.complete(result)
    }

    /// Hold the deletion confirmation, then head to the catalog.
    pub async fn settle_deletion(
        &self,
        flow: &mut DeletionFlow,
        scope: &ViewScope,
    ) -> Result<Route, CoreError> {
        scope.sleep(self.inner.config.confirmation_delay).await?;
        flow.finish()?;
        Ok(Route::catalog())
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Run the not-found countdown, then redirect home.
    pub async fn not_found_redirect(
        &self,
        scope: &ViewScope,
        on_tick: impl FnMut(u64) + Send,
    ) -> Result<Route, CoreError> {
        scope
            .countdown(self.inner.config.redirect_countdown, on_tick)
            .await?;
        Ok(Route::Home)
    }

    // ── Command execution ────────────────────────────────────────────

    /// Hand a command to the processor and wait for its result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.state.borrow() != ServiceState::Running {
            return Err(CoreError::ServiceStopped);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ServiceStopped)?;

        rx.await.map_err(|_| CoreError::ServiceStopped)?
    }

    /// Request a store refresh and tell subscribers about the mutation.
    async fn after_mutation(&self, result: &CommandResult) {
        info!(kind = %result.kind(), id = %result.product_id(), "mutation applied");

        let store = Arc::clone(&self.inner.store);
        let cancel = self.inner.cancel.clone();
        let refresh = tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                res = store.refresh() => {
                    if let Err(e) = res {
                        warn!(error = %e, "refresh after mutation failed");
                    }
                }
            }
        });
        {
            let mut handles = self.inner.task_handles.lock().await;
            handles.retain(|h| !h.is_finished());
            handles.push(refresh);
        }

        let _ = self.inner.event_tx.send(result.clone());
    }
}

fn build_transport(config: &StoreConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Execute commands one at a time. A command that has started always
/// runs to completion, even if its issuer stops waiting.
async fn command_processor_task(storefront: Storefront, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = storefront.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&storefront, envelope.command).await;
                if let Ok(ref done) = result {
                    storefront.after_mutation(done).await;
                }
                if envelope.response_tx.send(result).is_err() {
                    debug!("command issuer went away before the result arrived");
                }
            }
        }
    }
}

async fn route_command(storefront: &Storefront, cmd: Command) -> Result<CommandResult, CoreError> {
    let gateway = &storefront.inner.gateway;

    match cmd {
        Command::CreateProduct(payload) => gateway.create(&payload).await.map(CommandResult::Created),
        Command::UpdateProduct { id, payload } => gateway
            .update(&id, &payload)
            .await
            .map(CommandResult::Updated),
        Command::DeleteProduct { id } => {
            gateway.delete(&id).await?;
            Ok(CommandResult::Deleted(id))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;
    use crate::error::MutationKind;
    use crate::form::{FormPhase, StagedImage};
    use crate::testing::{Call, ScriptedGateway, mutation_error, product, wait_until};

    fn config() -> StoreConfig {
        StoreConfig::for_url("http://storefront.test").unwrap()
    }

    async fn started(gateway: &Arc<ScriptedGateway>) -> Storefront {
        let storefront = Storefront::with_gateway(config(), Arc::clone(gateway) as Arc<dyn ProductGateway>);
        storefront.start().await.unwrap();
        storefront
    }

    fn seeded() -> Arc<ScriptedGateway> {
        Arc::new(ScriptedGateway::with_products(vec![
            product(1, "electronics"),
            product(2, "jewelery"),
            product(3, "electronics"),
        ]))
    }

    fn fill(storefront: &Storefront, form: &mut ProductForm) {
        let previews = storefront.previews().clone();
        form.update(|d| d.set_title("Desk Lamp")).unwrap();
        form.update(|d| d.input_price("24.50")).unwrap();
        form.update(|d| d.set_description("Warm light")).unwrap();
        form.update(|d| d.select_category("other")).unwrap();
        form.update(|d| d.set_custom_category("lighting")).unwrap();
        let image = StagedImage::from_bytes("lamp.png", vec![7]).unwrap();
        form.update(|d| d.select_image(image, &previews)).unwrap();
    }

    #[tokio::test]
    async fn cached_detail_makes_no_request() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        storefront.refresh().await.unwrap();
        let scope = storefront.scope();

        let view = storefront
            .product_detail(&ProductId::from(2), &scope)
            .await
            .unwrap();
        assert_eq!(view.source, crate::view::DetailSource::Cache);
        assert_eq!(gateway.get_calls(), 0);
    }

    #[tokio::test]
    async fn uncached_detail_makes_exactly_one_request() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let scope = storefront.scope();

        let view = storefront
            .product_detail(&ProductId::from(3), &scope)
            .await
            .unwrap();
        assert_eq!(view.source, crate::view::DetailSource::Remote);
        assert_eq!(gateway.get_calls(), 1);
        assert_eq!(gateway.list_calls(), 0);

        let missing = storefront
            .product_detail(&ProductId::from(99), &scope)
            .await;
        assert!(matches!(missing, Err(CoreError::ProductNotFound { .. })));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_gateway() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        storefront.refresh().await.unwrap();
        let scope = storefront.scope();

        let mut form = storefront.add_form();
        form.update(|d| d.set_title("No price")).unwrap();
        let err = storefront.submit_form(&mut form, &scope).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(gateway.mutation_calls(), 0);
        assert_eq!(storefront.store().len(), 3);
    }

    #[tokio::test]
    async fn create_sends_custom_category_and_refreshes() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        storefront.refresh().await.unwrap();
        let mut stream = storefront.store().subscribe();
        let mut events = storefront.events();
        let scope = storefront.scope();

        let mut form = storefront.add_form();
        fill(&storefront, &mut form);
        let outcome = storefront.submit_form(&mut form, &scope).await.unwrap();

        let SubmitOutcome::Confirmed { output, .. } = outcome else {
            panic!("expected confirmation");
        };
        assert_eq!(output.category, "lighting");
        let Call::Create(payload) = gateway.calls().into_iter().find(|c| matches!(c, Call::Create(_))).unwrap() else {
            unreachable!()
        };
        assert_eq!(payload.category, "lighting");

        let event = events.recv().await.unwrap();
        assert_eq!(event.kind(), MutationKind::Create);

        let refreshed = stream.changed().await.unwrap();
        assert_eq!(refreshed.len(), 4);
        assert!(refreshed.categories().iter().any(|c| c == "lighting"));
    }

    #[tokio::test]
    async fn failed_update_keeps_the_form_editable() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let scope = storefront.scope();
        gateway.fail_next(MutationKind::Update, mutation_error(MutationKind::Update, "nope"));

        let mut form = storefront
            .edit_form(&ProductId::from(1), &scope)
            .await
            .unwrap();
        form.update(|d| d.set_title("Renamed")).unwrap();
        let outcome = storefront.submit_form(&mut form, &scope).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "Error submitting form. Please try again: nope".into()
            }
        );
        assert_eq!(form.draft().title(), "Renamed");
        assert!(!form.is_locked());
        assert!(form.guard_armed());
    }

    #[tokio::test]
    async fn deleted_product_is_gone_after_refresh() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        storefront.refresh().await.unwrap();
        let scope = storefront.scope();

        let target = storefront.store().find(&ProductId::from(2)).unwrap();
        let mut flow = DeletionFlow::new();
        flow.request(&target).unwrap();
        let outcome = storefront.confirm_deletion(&mut flow, &scope).await.unwrap();
        assert!(matches!(outcome, DeletionOutcome::Deleted { .. }));

        let snapshot = storefront.refresh().await.unwrap();
        assert!(snapshot.find(&ProductId::from(2)).is_none());
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn disposed_view_does_not_see_late_result() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let mut events = storefront.events();
        let (release, gate) = oneshot::channel();
        gateway.gate_next_mutation(gate);

        let parent = storefront.scope();
        let child = parent.child();
        let mut form = storefront.add_form();
        fill(&storefront, &mut form);

        let task = {
            let storefront = storefront.clone();
            tokio::spawn(async move {
                let result = storefront.submit_form(&mut form, &child).await;
                (result, form)
            })
        };
        wait_until("create dispatch", || gateway.mutation_calls() >= 1).await;

        parent.dispose();
        let (result, form) = task.await.unwrap();
        assert!(matches!(result, Err(CoreError::Disposed)));
        assert_eq!(form.phase(), &FormPhase::Submitting);

        release.send(()).unwrap();
        let event = events.recv().await.unwrap();
        assert_eq!(event.kind(), MutationKind::Create, "mutation still completed");
    }

    #[tokio::test(start_paused = true)]
    async fn confirmation_resets_create_form_after_delay() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let scope = storefront.scope();

        let mut form = storefront.add_form();
        fill(&storefront, &mut form);
        storefront.submit_form(&mut form, &scope).await.unwrap();

        let exit = storefront.settle_form(&mut form, &scope).await.unwrap();
        assert_eq!(Route::from(exit), Route::AddProduct);
        assert_eq!(form.draft().title(), "");
        assert_eq!(storefront.previews().live_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn deletion_settles_to_catalog() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let scope = storefront.scope();
        let mut flow = DeletionFlow::new();
        flow.request(&product(1, "electronics")).unwrap();
        storefront.confirm_deletion(&mut flow, &scope).await.unwrap();

        let route = storefront.settle_deletion(&mut flow, &scope).await.unwrap();
        assert_eq!(route, Route::catalog());
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_counts_down_then_goes_home() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let scope = storefront.scope();
        let mut ticks = Vec::new();

        let route = storefront
            .not_found_redirect(&scope, |left| ticks.push(left))
            .await
            .unwrap();
        assert_eq!(route, Route::Home);
        assert_eq!(ticks, (1..=10).rev().collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn execute_requires_start() {
        let gateway = seeded();
        let storefront = Storefront::with_gateway(config(), gateway);
        let err = storefront
            .execute(Command::DeleteProduct { id: ProductId::from(1) })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ServiceStopped));
    }

    #[tokio::test]
    async fn started_storefront_executes_commands() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        assert_eq!(*storefront.state().borrow(), ServiceState::Running);

        let result = storefront
            .execute(Command::DeleteProduct { id: ProductId::from(1) })
            .await
            .unwrap();
        assert!(matches!(result, CommandResult::Deleted(ref id) if id.as_str() == "1"));
        assert!(gateway.calls().contains(&Call::Delete(ProductId::from(1))));

        storefront.shutdown().await;
        let err = storefront
            .execute(Command::DeleteProduct { id: ProductId::from(2) })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ServiceStopped));
    }

    #[tokio::test]
    async fn shutdown_disposes_scopes() {
        let gateway = seeded();
        let storefront = started(&gateway).await;
        let scope = storefront.scope();
        storefront.shutdown().await;
        assert!(scope.is_disposed());
        assert_eq!(*storefront.state().borrow(), ServiceState::Stopped);
    }
}
