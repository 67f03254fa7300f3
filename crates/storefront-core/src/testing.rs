// In-memory gateway and fixtures shared by the unit tests.
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{CoreError, FailureKind, MutationKind};
use crate::gateway::ProductGateway;
use crate::model::{Product, ProductId, ProductPayload};

pub(crate) fn product(id: u64, category: &str) -> Product {
    Product {
        id: ProductId::from(id),
        title: format!("Product {id}"),
        price: 10.0,
        description: format!("Description of product {id}"),
        category: category.into(),
        image: format!("https://example.test/{id}.png"),
        rating: None,
    }
}

pub(crate) fn fetch_error(message: &str) -> CoreError {
    CoreError::Fetch {
        resource: "products".into(),
        message: message.into(),
        failure: FailureKind::Connection,
        status: None,
    }
}

pub(crate) fn mutation_error(kind: MutationKind, message: &str) -> CoreError {
    CoreError::Mutation {
        kind,
        message: message.into(),
        failure: FailureKind::Status,
        status: Some(500),
    }
}

/// Yield until `ready` holds, failing the test after a few seconds.
pub(crate) async fn wait_until(what: &str, ready: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !ready() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {what}"));
}

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Get(ProductId),
    Create(ProductPayload),
    Update(ProductId, ProductPayload),
    Delete(ProductId),
}

struct ListReply {
    result: Result<Vec<Product>, CoreError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Product backend held in memory.
///
/// Mutations change the held list the way the real API would, so a
/// refresh after a delete no longer returns the deleted product. List
/// replies and mutation failures can be scripted ahead of time.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    products: Mutex<Vec<Product>>,
    list_replies: Mutex<VecDeque<ListReply>>,
    failures: Mutex<Vec<(MutationKind, CoreError)>>,
    mutation_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<Call>>,
    list_calls: AtomicUsize,
    next_id: AtomicU64,
}

impl ScriptedGateway {
    pub(crate) fn with_products(products: Vec<Product>) -> Self {
        let gateway = Self::default();
        gateway.next_id.store(100, Ordering::SeqCst);
        *gateway.products.lock().unwrap() = products;
        gateway
    }

    /// Queue the reply for the next `list()` call. With a gate, the
    /// reply is held back until the gate's sender fires.
    pub(crate) fn script_list(
        &self,
        result: Result<Vec<Product>, CoreError>,
        gate: Option<oneshot::Receiver<()>>,
    ) {
        self.list_replies
            .lock()
            .unwrap()
            .push_back(ListReply { result, gate });
    }

    /// Make the next mutation of `kind` fail with `err`.
    pub(crate) fn fail_next(&self, kind: MutationKind, err: CoreError) {
        self.failures.lock().unwrap().push((kind, err));
    }

    /// Hold the next mutation until the gate's sender fires.
    pub(crate) fn gate_next_mutation(&self, gate: oneshot::Receiver<()>) {
        *self.mutation_gate.lock().unwrap() = Some(gate);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Get(_)))
            .count()
    }

    pub(crate) fn mutation_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, Call::List | Call::Get(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    async fn mutation_prelude(&self, kind: MutationKind) -> Result<(), CoreError> {
        let gate = self.mutation_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let mut failures = self.failures.lock().unwrap();
        match failures.iter().position(|(k, _)| *k == kind) {
            Some(pos) => Err(failures.remove(pos).1),
            None => Ok(()),
        }
    }

    fn build(&self, id: ProductId, payload: &ProductPayload) -> Product {
        Product {
            id,
            title: payload.title.clone(),
            price: payload.price,
            description: payload.description.clone(),
            category: payload.category.clone(),
            image: payload.image.clone(),
            rating: None,
        }
    }
}

#[async_trait]
impl ProductGateway for ScriptedGateway {
    async fn list(&self) -> Result<Vec<Product>, CoreError> {
        self.record(Call::List);
        let reply = self.list_replies.lock().unwrap().pop_front();
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match reply {
            Some(ListReply { result, gate }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Ok(self.products.lock().unwrap().clone()),
        }
    }

    async fn get(&self, id: &ProductId) -> Result<Product, CoreError> {
        self.record(Call::Get(id.clone()));
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CoreError::ProductNotFound { id: id.to_string() })
    }

    async fn create(&self, payload: &ProductPayload) -> Result<Product, CoreError> {
        self.record(Call::Create(payload.clone()));
        self.mutation_prelude(MutationKind::Create).await?;
        let id = ProductId::from(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let created = self.build(id, payload);
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, CoreError> {
        self.record(Call::Update(id.clone(), payload.clone()));
        self.mutation_prelude(MutationKind::Update).await?;
        let updated = self.build(id.clone(), payload);
        let mut products = self.products.lock().unwrap();
        if let Some(slot) = products.iter_mut().find(|p| &p.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), CoreError> {
        self.record(Call::Delete(id.clone()));
        self.mutation_prelude(MutationKind::Delete).await?;
        self.products.lock().unwrap().retain(|p| &p.id != id);
        Ok(())
    }
}
