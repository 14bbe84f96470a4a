//! Warehouse stock client: loads the shared product list from the inventory
//! REST API, derives per-warehouse views from it, and lets a warehouseman
//! adjust the quantity held at their own warehouse.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod edit;
pub mod error;
pub mod forms;
pub mod models;
pub mod repository;
pub mod session;
pub mod stats;

#[cfg(test)]
mod testing;

pub use api::{HttpClient, ProductApi, WarehousemanApi};
pub use app::{Dashboard, Inventory};
pub use config::Config;
pub use edit::{EditState, StockEdit, SubmitOutcome};
pub use error::{ApiError, ConfigError, EditError, RepositoryError, SessionError, ValidationErrors};
pub use repository::{LoadState, ProductRepository};
