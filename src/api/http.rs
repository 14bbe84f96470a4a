use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::{ProductApi, WarehousemanApi};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Product, ProductDraft, ProductId, ProductPatch, Warehouseman};

/// JSON client for the inventory REST API. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(&config.api_url, config.timeout)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        self.execute(self.client.get(&url), url).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.client.request(method, &url).json(body);
        self.execute(request, url).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: String,
    ) -> Result<T, ApiError> {
        debug!("Requesting {}", url);
        let response = request.send().await.map_err(|source| {
            error!("Request to {} failed: {}", url, source);
            ApiError::Transport {
                url: url.clone(),
                source,
            }
        })?;
        read_json(url, response).await
    }
}

async fn read_json<T: DeserializeOwned>(url: String, response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        error!("{} not found", url);
        return Err(ApiError::NotFound(url));
    }

    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read response body".to_string());
        error!("{} returned {}: {}", url, status, body);
        return Err(ApiError::Status {
            url,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(source) => {
            error!("Failed to read response from {}: {}", url, source);
            return Err(ApiError::Transport { url, source });
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| {
        error!("Malformed response from {}: {}", url, source);
        ApiError::Decode { url, source }
    })
}

fn product_path(id: &ProductId) -> String {
    format!("/products/{}", urlencoding::encode(id.as_str()))
}

#[async_trait]
impl ProductApi for HttpClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_json("/products").await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get_json(&product_path(id)).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.send_json(Method::POST, "/products", draft).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        self.send_json(Method::PUT, &product_path(id), patch).await
    }

    async fn products_by_barcode(&self, barcode: &str) -> Result<Vec<Product>, ApiError> {
        let url = self.url("/products");
        let request = self.client.get(&url).query(&[("barcode", barcode)]);
        self.execute(request, url).await
    }
}

#[async_trait]
impl WarehousemanApi for HttpClient {
    async fn list_warehousemen(&self) -> Result<Vec<Warehouseman>, ApiError> {
        self.get_json("/warehousemans").await
    }
}
