use serde::{Deserialize, Serialize};

use super::{WarehouseId, WarehousemanId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouseman {
    pub id: WarehousemanId,
    pub name: String,
    pub secret_key: String,
    pub warehouse_id: WarehouseId,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Who is editing: the signed-in warehouseman and the one warehouse they may
/// change stock for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub warehouseman_id: WarehousemanId,
    pub warehouse_id: WarehouseId,
    pub name: String,
}

impl From<Warehouseman> for Session {
    fn from(warehouseman: Warehouseman) -> Self {
        Self {
            warehouseman_id: warehouseman.id,
            warehouse_id: warehouseman.warehouse_id,
            name: warehouseman.name,
        }
    }
}

/// A selectable warehouse in the add-product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub city: String,
}
