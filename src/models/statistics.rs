use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rollup of one warehouse's slice of the product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStats {
    pub total_products: usize,
    pub out_of_stock: usize,
    pub total_value: Decimal,
}

/// Server-computed statistics from `GET /statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralStatistics {
    pub total_products: u64,
    pub out_of_stock: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_stock_value: Decimal,
    pub most_added_products: Vec<serde_json::Value>,
    pub most_removed_products: Vec<serde_json::Value>,
}
