pub mod ids;
pub mod product;
pub mod statistics;
pub mod warehouseman;

pub use ids::{ProductId, WarehouseId, WarehousemanId};
pub use product::{EditRecord, Localisation, Product, ProductDraft, ProductPatch, StockEntry};
pub use statistics::{GeneralStatistics, WarehouseStats};
pub use warehouseman::{Session, Warehouse, Warehouseman};
