//! Server-side statistics endpoints. Display convenience only; nothing in
//! the stock core depends on them.

use log::warn;
use rust_decimal::Decimal;
use serde_json::Value;

use super::HttpClient;
use crate::error::ApiError;
use crate::models::{GeneralStatistics, WarehouseId};

pub const DEFAULT_MOVEMENT_PERIOD: &str = "30days";

impl HttpClient {
    pub async fn general_statistics(&self) -> Result<GeneralStatistics, ApiError> {
        self.get_json("/statistics").await
    }

    pub async fn product_statistics(&self) -> Result<Value, ApiError> {
        self.get_json("/statistics/products").await
    }

    pub async fn stock_statistics(&self) -> Result<Value, ApiError> {
        self.get_json("/statistics/stocks").await
    }

    pub async fn warehouse_statistics(&self, warehouse_id: WarehouseId) -> Result<Value, ApiError> {
        self.get_json(&format!("/statistics/warehouse/{}", warehouse_id))
            .await
    }

    pub async fn value_statistics(&self) -> Result<Value, ApiError> {
        self.get_json("/statistics/value").await
    }

    pub async fn most_moved_products(&self, period: &str) -> Result<Value, ApiError> {
        self.get_json(&format!(
            "/statistics/products/most-moved?period={}",
            urlencoding::encode(period)
        ))
        .await
    }

    // The readers below degrade to zero instead of failing.

    pub async fn total_products(&self) -> u64 {
        self.general_or_default("total products").await.total_products
    }

    pub async fn out_of_stock(&self) -> u64 {
        self.general_or_default("out of stock products").await.out_of_stock
    }

    pub async fn total_stock_value(&self) -> Decimal {
        self.general_or_default("total stock value")
            .await
            .total_stock_value
    }

    async fn general_or_default(&self, what: &str) -> GeneralStatistics {
        self.general_statistics().await.unwrap_or_else(|err| {
            warn!("Error fetching {}: {}", what, err);
            GeneralStatistics::default()
        })
    }
}
