//! Fixtures and an in-memory API for unit tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Mutex;

use crate::api::{ProductApi, WarehousemanApi};
use crate::error::ApiError;
use crate::models::{
    EditRecord, Localisation, Product, ProductDraft, ProductId, ProductPatch, Session,
    StockEntry, WarehouseId, Warehouseman, WarehousemanId,
};

pub fn stock(id: i64, quantity: u32) -> StockEntry {
    StockEntry {
        id: WarehouseId(id),
        name: format!("Warehouse {id}"),
        quantity,
        localisation: Localisation {
            city: "Marrakesh".to_string(),
            latitude: 31.63,
            longitude: -8.0,
        },
    }
}

pub fn edit(warehouseman_id: i64, at: &str) -> EditRecord {
    EditRecord {
        warehouseman_id: WarehousemanId(warehouseman_id),
        at: at.to_string(),
    }
}

pub fn product(id: &str, price: i64, stocks: Vec<StockEntry>, edited_by: Vec<EditRecord>) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        product_type: "Informatique".to_string(),
        barcode: "6111234567890".to_string(),
        price: Decimal::from(price),
        solde: None,
        supplier: "Dell".to_string(),
        image: String::new(),
        stocks,
        edited_by,
    }
}

pub fn session(warehouseman_id: i64, warehouse_id: i64) -> Session {
    Session {
        warehouseman_id: WarehousemanId(warehouseman_id),
        warehouse_id: WarehouseId(warehouse_id),
        name: "Yassine".to_string(),
    }
}

fn unavailable(path: &str) -> ApiError {
    ApiError::Status {
        url: format!("http://fake{path}"),
        status: 503,
        body: "service unavailable".to_string(),
    }
}

/// Behaves like the json-server backend: PUT replaces the stored document.
#[derive(Default)]
pub struct FakeApi {
    pub products: Mutex<Vec<Product>>,
    pub warehousemen: Vec<Warehouseman>,
    pub fail_reads: Mutex<bool>,
    pub fail_writes: Mutex<bool>,
    pub stall_writes: Mutex<bool>,
    pub calls: Mutex<Vec<String>>,
    pub next_id: Mutex<u64>,
}

impl FakeApi {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        *self.fail_reads.lock().unwrap() = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    /// Makes updates hang until the caller gives up on them.
    pub fn set_stall_writes(&self, stall: bool) {
        *self.stall_writes.lock().unwrap() = stall;
    }

    pub fn stored(&self, id: &str) -> Option<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id.as_str() == id)
            .cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn reads_fail(&self) -> bool {
        *self.fail_reads.lock().unwrap()
    }

    fn writes_fail(&self) -> bool {
        *self.fail_writes.lock().unwrap()
    }
}

#[async_trait]
impl ProductApi for FakeApi {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.record("GET /products".to_string());
        if self.reads_fail() {
            return Err(unavailable("/products"));
        }
        Ok(self.products.lock().unwrap().clone())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.record(format!("GET /products/{id}"));
        if self.reads_fail() {
            return Err(unavailable("/products"));
        }
        self.stored(id.as_str())
            .ok_or_else(|| ApiError::NotFound(format!("http://fake/products/{id}")))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.record("POST /products".to_string());
        if self.writes_fail() {
            return Err(unavailable("/products"));
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let created = Product {
            id: ProductId::new(format!("new-{}", *next_id)),
            name: draft.name.clone(),
            product_type: draft.product_type.clone(),
            barcode: draft.barcode.clone(),
            price: draft.price,
            solde: None,
            supplier: draft.supplier.clone(),
            image: draft.image.clone(),
            stocks: draft.stocks.clone(),
            edited_by: draft.edited_by.clone(),
        };
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: &ProductId, patch: &ProductPatch) -> Result<Product, ApiError> {
        self.record(format!("PUT /products/{id}"));
        let stalled = *self.stall_writes.lock().unwrap();
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.writes_fail() {
            return Err(unavailable("/products"));
        }
        let mut products = self.products.lock().unwrap();
        let stored = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("http://fake/products/{id}")))?;

        if let Some(name) = &patch.name {
            stored.name = name.clone();
        }
        if let Some(product_type) = &patch.product_type {
            stored.product_type = product_type.clone();
        }
        if let Some(barcode) = &patch.barcode {
            stored.barcode = barcode.clone();
        }
        if let Some(price) = patch.price {
            stored.price = price;
        }
        stored.solde = patch.solde;
        if let Some(supplier) = &patch.supplier {
            stored.supplier = supplier.clone();
        }
        if let Some(image) = &patch.image {
            stored.image = image.clone();
        }
        if let Some(stocks) = &patch.stocks {
            stored.stocks = stocks.clone();
        }
        if let Some(edited_by) = &patch.edited_by {
            stored.edited_by = edited_by.clone();
        }
        Ok(stored.clone())
    }

    async fn products_by_barcode(&self, barcode: &str) -> Result<Vec<Product>, ApiError> {
        self.record(format!("GET /products?barcode={barcode}"));
        if self.reads_fail() {
            return Err(unavailable("/products"));
        }
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.barcode == barcode)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WarehousemanApi for FakeApi {
    async fn list_warehousemen(&self) -> Result<Vec<Warehouseman>, ApiError> {
        self.record("GET /warehousemans".to_string());
        if self.reads_fail() {
            return Err(unavailable("/warehousemans"));
        }
        Ok(self.warehousemen.clone())
    }
}
