pub mod http;
pub mod statistics;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{Product, ProductDraft, ProductId, ProductPatch, Warehouseman};

pub use http::HttpClient;

/// Product endpoints of the REST API.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// `GET /products`
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// `GET /products/:id`
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError>;

    /// `POST /products`
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError>;

    /// `PUT /products/:id`
    async fn update_product(&self, id: &ProductId, patch: &ProductPatch)
        -> Result<Product, ApiError>;

    /// `GET /products?barcode=<code>`
    async fn products_by_barcode(&self, barcode: &str) -> Result<Vec<Product>, ApiError>;
}

#[async_trait]
pub trait WarehousemanApi: Send + Sync {
    /// `GET /warehousemans`
    async fn list_warehousemen(&self) -> Result<Vec<Warehouseman>, ApiError>;
}
