// ── Remote product gateway ──
//
// The store and the command processor only talk to the product API
// through this trait, so tests can substitute a scripted backend.

use async_trait::async_trait;
use storefront_api::{ProductBody, ProductClient};

use crate::error::{CoreError, MutationKind};
use crate::model::{Product, ProductId, ProductPayload};

/// The five product operations the storefront needs.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, CoreError>;

    async fn get(&self, id: &ProductId) -> Result<Product, CoreError>;

    async fn create(&self, payload: &ProductPayload) -> Result<Product, CoreError>;

    async fn update(&self, id: &ProductId, payload: &ProductPayload)
    -> Result<Product, CoreError>;

    async fn delete(&self, id: &ProductId) -> Result<(), CoreError>;
}

#[async_trait]
impl ProductGateway for ProductClient {
    async fn list(&self) -> Result<Vec<Product>, CoreError> {
        let products = self
            .list_products()
            .await
            .map_err(|e| CoreError::fetch("products", &e))?;
        Ok(products.into_iter().map(Product::from).collect())
    }

    async fn get(&self, id: &ProductId) -> Result<Product, CoreError> {
        self.get_product(id)
            .await
            .map(Product::from)
            .map_err(|e| CoreError::fetch_product(id, &e))
    }

    async fn create(&self, payload: &ProductPayload) -> Result<Product, CoreError> {
        self.create_product(&ProductBody::from(payload))
            .await
            .map(Product::from)
            .map_err(|e| CoreError::mutation(MutationKind::Create, &e))
    }

    async fn update(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> Result<Product, CoreError> {
        self.update_product(id, &ProductBody::from(payload))
            .await
            .map(Product::from)
            .map_err(|e| CoreError::mutation(MutationKind::Update, &e))
    }

    async fn delete(&self, id: &ProductId) -> Result<(), CoreError> {
        self.delete_product(id)
            .await
            .map_err(|e| CoreError::mutation(MutationKind::Delete, &e))
    }
}
