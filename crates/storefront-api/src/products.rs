// Product endpoints
//
// Collection: `/products`. Item: `/products/{id}`.

use tracing::debug;

use crate::client::ProductClient;
use crate::error::Error;
use crate::models::{ProductBody, ProductId, ProductResponse};

const PRODUCTS: &str = "products";

impl ProductClient {
    /// List every product, in server order.
    ///
    /// `GET /products`
    pub async fn list_products(&self) -> Result<Vec<ProductResponse>, Error> {
        debug!("listing products");
        self.get(&[PRODUCTS]).await
    }

    /// Fetch a single product.
    ///
    /// `GET /products/{id}`
    pub async fn get_product(&self, id: &ProductId) -> Result<ProductResponse, Error> {
        debug!(%id, "fetching product");
        self.get(&[PRODUCTS, id.as_str()]).await
    }

    /// Create a product. The server assigns the id.
    ///
    /// `POST /products`
    pub async fn create_product(&self, body: &ProductBody) -> Result<ProductResponse, Error> {
        debug!(title = %body.title, "creating product");
        self.post(&[PRODUCTS], body).await
    }

    /// Replace a product's fields.
    ///
    /// `PUT /products/{id}`
    pub async fn update_product(
        &self,
        id: &ProductId,
        body: &ProductBody,
    ) -> Result<ProductResponse, Error> {
        debug!(%id, "updating product");
        self.put(&[PRODUCTS, id.as_str()], body).await
    }

    /// Delete a product. The response body is an acknowledgement only.
    ///
    /// `DELETE /products/{id}`
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), Error> {
        debug!(%id, "deleting product");
        self.delete(&[PRODUCTS, id.as_str()]).await
    }
}
