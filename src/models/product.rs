use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use super::{ProductId, WarehouseId, WarehousemanId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    // Former price, listed after `price` when present.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub solde: Option<Decimal>,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub image: String,
    #[serde(deserialize_with = "unique_stocks")]
    pub stocks: Vec<StockEntry>,
    pub edited_by: Vec<EditRecord>,
}

impl Product {
    pub fn stock_for(&self, warehouse_id: WarehouseId) -> Option<&StockEntry> {
        self.stocks.iter().find(|stock| stock.id == warehouse_id)
    }

    /// Units on hand across every warehouse.
    pub fn total_quantity(&self) -> u64 {
        self.stocks.iter().map(|stock| u64::from(stock.quantity)).sum()
    }

    /// Head of the edit history, the most recent edit by convention.
    pub fn last_edit(&self) -> Option<&EditRecord> {
        self.edited_by.first()
    }

    pub fn edited_by_warehouseman(&self, warehouseman_id: WarehousemanId) -> bool {
        self.edited_by
            .iter()
            .any(|edit| edit.warehouseman_id == warehouseman_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockEntry {
    pub id: WarehouseId,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub localisation: Localisation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localisation {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    pub warehouseman_id: WarehousemanId,
    /// Kept as sent by the server: `YYYY-MM-DD`, an RFC 3339 date-time, or an
    /// ISO 8601 date-time without an offset.
    pub at: String,
}

impl EditRecord {
    pub fn now(warehouseman_id: WarehousemanId) -> Self {
        Self::at(warehouseman_id, Utc::now())
    }

    pub fn at(warehouseman_id: WarehousemanId, when: DateTime<Utc>) -> Self {
        Self {
            warehouseman_id,
            at: when.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.at.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        // Date-times without an offset are taken as UTC.
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(at.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|at| at.and_utc())
    }
}

/// Body of `POST /products`. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub barcode: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub supplier: String,
    pub image: String,
    pub stocks: Vec<StockEntry>,
    pub edited_by: Vec<EditRecord>,
}

/// Body of `PUT /products/:id`. Absent fields are left out of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub solde: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stocks: Option<Vec<StockEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<Vec<EditRecord>>,
}

// The server replaces the whole document on PUT, so a patch built from a
// snapshot carries every field except the id.
impl From<&Product> for ProductPatch {
    fn from(product: &Product) -> Self {
        Self {
            name: Some(product.name.clone()),
            product_type: Some(product.product_type.clone()),
            barcode: Some(product.barcode.clone()),
            price: Some(product.price),
            solde: product.solde,
            supplier: Some(product.supplier.clone()),
            image: Some(product.image.clone()),
            stocks: Some(product.stocks.clone()),
            edited_by: Some(product.edited_by.clone()),
        }
    }
}

fn unique_stocks<'de, D>(deserializer: D) -> Result<Vec<StockEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let stocks = Vec::<StockEntry>::deserialize(deserializer)?;
    let mut seen = HashSet::new();
    for stock in &stocks {
        if !seen.insert(stock.id) {
            return Err(de::Error::custom(format!(
                "duplicate stock entry for warehouse {}",
                stock.id
            )));
        }
    }
    Ok(stocks)
}
