use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use warehouseops::models::{ProductId, WarehouseId, WarehousemanId};
use warehouseops::session::login;
use warehouseops::{
    ApiError, HttpClient, Inventory, LoadState, ProductApi, ProductRepository, RepositoryError,
    SubmitOutcome,
};

/// Minimal stand-in for the json-server backend. PUT replaces the document.
#[derive(Clone)]
struct Backend {
    products: Arc<Mutex<Vec<Value>>>,
    broken: Arc<AtomicBool>,
}

impl Backend {
    fn new(products: Vec<Value>) -> Self {
        Self {
            products: Arc::new(Mutex::new(products)),
            broken: Arc::new(AtomicBool::new(false)),
        }
    }

    fn document(&self, id: &str) -> Option<Value> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p["id"] == id)
            .cloned()
    }
}

async fn list_products(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    if backend.broken.load(Ordering::SeqCst) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let products = backend.products.lock().unwrap().clone();
    let selected: Vec<Value> = match params.get("barcode") {
        Some(code) => products.into_iter().filter(|p| p["barcode"] == *code).collect(),
        None => products,
    };
    Ok(Json(Value::Array(selected)))
}

async fn get_product(
    State(backend): State<Backend>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    backend.document(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_product(
    State(backend): State<Backend>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut products = backend.products.lock().unwrap();
    body["id"] = json!(format!("p{}", products.len() + 1));
    products.push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn update_product(
    State(backend): State<Backend>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut products = backend.products.lock().unwrap();
    let slot = products
        .iter_mut()
        .find(|p| p["id"] == id.as_str())
        .ok_or(StatusCode::NOT_FOUND)?;
    body["id"] = json!(id);
    *slot = body.clone();
    Ok(Json(body))
}

async fn warehousemen() -> Json<Value> {
    Json(json!([
        {"id": "1333", "name": "Yassine", "secretKey": "GU1999", "warehouseId": 1,
         "image": "", "dob": "1990-04-02", "city": "Marrakesh"},
        {"id": "1444", "name": "Salma", "secretKey": "LA2991", "warehouseId": 2,
         "image": "", "dob": "1992-11-20", "city": "Oujda"}
    ]))
}

async fn statistics() -> Json<Value> {
    Json(json!({"totalProducts": 12, "outOfStock": 3, "totalStockValue": 45250.5}))
}

async fn broken_statistics() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

fn seed() -> Vec<Value> {
    vec![
        json!({
            "id": "p1", "name": "Laptop", "type": "Informatique", "barcode": "6111234567890",
            "price": 100, "supplier": "Dell", "image": "",
            "stocks": [
                {"id": 1, "name": "Gueliz B2", "quantity": 5,
                 "localisation": {"city": "Marrakesh", "latitude": 31.63, "longitude": -8.0}},
                {"id": 2, "name": "Lazari H2", "quantity": 0,
                 "localisation": {"city": "Oujda", "latitude": 34.68, "longitude": -1.9}}
            ],
            "editedBy": [{"warehousemanId": 9, "at": "2024-01-01"}]
        }),
        json!({
            "id": "p2", "name": "Headset", "type": "Accessoires", "barcode": "4006381333931",
            "price": 35.5, "supplier": "Logitech", "image": "",
            "stocks": [{"id": 2, "name": "Lazari H2", "quantity": 7,
                        "localisation": {"city": "Oujda", "latitude": 34.68, "longitude": -1.9}}],
            "editedBy": []
        }),
    ]
}

async fn serve(backend: Backend, statistics_up: bool) -> HttpClient {
    let stats_route = if statistics_up {
        get(statistics)
    } else {
        get(broken_statistics)
    };
    let router = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", get(get_product).put(update_product))
        .route("/warehousemans", get(warehousemen))
        .route("/statistics", stats_route)
        .with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    HttpClient::with_timeout(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn loads_the_product_list() {
    let client = serve(Backend::new(seed()), true).await;
    let mut repository = ProductRepository::new(client);

    let products = repository.fetch_all().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[1].price, Decimal::new(355, 1));
    assert_eq!(products[0].stock_for(WarehouseId(1)).unwrap().quantity, 5);
    assert_eq!(repository.state(), &LoadState::Ready);
}

#[tokio::test]
async fn missing_product_is_not_found() {
    let client = serve(Backend::new(seed()), true).await;
    let mut repository = ProductRepository::new(client);

    let err = repository
        .fetch_by_id(&ProductId::new("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(_)));
}

#[tokio::test]
async fn malformed_documents_are_rejected() {
    let mut broken = seed();
    broken[0].as_object_mut().unwrap().remove("stocks");
    let client = serve(Backend::new(broken), true).await;

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn server_errors_keep_the_cached_list() {
    let backend = Backend::new(seed());
    let client = serve(backend.clone(), true).await;
    let mut repository = ProductRepository::new(client);
    repository.fetch_all().await.unwrap();

    backend.broken.store(true, Ordering::SeqCst);
    let err = repository.fetch_all().await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Fetch(ApiError::Status { status: 500, .. })
    ));
    assert!(repository.is_stale());
    assert_eq!(repository.products().len(), 2);
}

#[tokio::test]
async fn barcode_lookup_uses_the_query_string() {
    let client = serve(Backend::new(seed()), true).await;
    let repository = ProductRepository::new(client);

    let found = repository.find_by_barcode("4006381333931").await.unwrap();
    assert_eq!(found.unwrap().id, ProductId::new("p2"));
    assert!(repository.find_by_barcode("99999999").await.unwrap().is_none());
}

#[tokio::test]
async fn sign_in_edit_and_confirm() {
    let backend = Backend::new(seed());
    let client = serve(backend.clone(), true).await;

    let session = login(&client, "LA2991").await.unwrap();
    assert_eq!(session.warehouseman_id, WarehousemanId(1444));
    assert_eq!(session.warehouse_id, WarehouseId(2));

    let mut inventory = Inventory::start(client, session);
    inventory.refresh().await.unwrap();

    let before = inventory.dashboard();
    assert_eq!(before.stats.total_products, 2);
    assert_eq!(before.stats.out_of_stock, 1);
    assert!(before.recent.is_empty());

    let id = ProductId::new("p1");
    let mut edit = inventory.begin_edit(&id).unwrap();
    edit.increment();
    edit.increment();

    let mut confirmed = None;
    let outcome = inventory
        .submit_edit(&mut edit, |product| confirmed = Some(product.clone()))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::Saved(_)));

    let confirmed = confirmed.unwrap();
    assert_eq!(confirmed.stocks[1].quantity, 2);
    assert_eq!(confirmed.stocks[0].quantity, 5);

    // The server document kept every field the PUT did not mean to touch.
    let stored = backend.document("p1").unwrap();
    assert_eq!(stored["name"], "Laptop");
    assert_eq!(stored["supplier"], "Dell");
    assert_eq!(stored["stocks"][0]["localisation"]["city"], "Marrakesh");
    assert_eq!(stored["editedBy"].as_array().unwrap().len(), 2);
    assert_eq!(stored["editedBy"][0]["warehousemanId"], 1444);
    assert_eq!(stored["editedBy"][1]["at"], "2024-01-01");

    let after = inventory.dashboard();
    assert_eq!(after.stats.out_of_stock, 0);
    assert_eq!(after.recent[0].id, id);
}

#[tokio::test]
async fn rejects_unknown_secret_key() {
    let client = serve(Backend::new(seed()), true).await;
    assert!(login(&client, "nope").await.is_err());
}

#[tokio::test]
async fn statistics_readers_degrade_to_zero() {
    let up = serve(Backend::new(seed()), true).await;
    assert_eq!(up.total_products().await, 12);
    assert_eq!(up.out_of_stock().await, 3);
    assert_eq!(up.total_stock_value().await, Decimal::new(452505, 1));

    let down = serve(Backend::new(seed()), false).await;
    assert!(down.general_statistics().await.is_err());
    assert_eq!(down.total_products().await, 0);
    assert_eq!(down.out_of_stock().await, 0);
    assert_eq!(down.total_stock_value().await, Decimal::ZERO);
}
