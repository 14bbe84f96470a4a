//! Warehouse-scoped rollups over the shared product list. Read only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Product, WarehouseId, WarehouseStats, WarehousemanId};

/// Counts the products stocked at `warehouse_id`, how many of those sit at
/// zero, and what the warehouse's units are worth.
///
/// A product counts as stocked whenever it has an entry for the warehouse,
/// even with a quantity of zero.
pub fn warehouse_stats(products: &[Product], warehouse_id: WarehouseId) -> WarehouseStats {
    products
        .iter()
        .filter_map(|product| {
            product
                .stock_for(warehouse_id)
                .map(|stock| (product, stock.quantity))
        })
        .fold(WarehouseStats::default(), |mut stats, (product, quantity)| {
            stats.total_products += 1;
            if quantity == 0 {
                stats.out_of_stock += 1;
            }
            stats.total_value += Decimal::from(quantity) * product.price;
            stats
        })
}

/// Products `warehouseman_id` has ever edited, newest first, at most `limit`.
///
/// Ordering uses the head of each product's history, which may be someone
/// else's later edit rather than this warehouseman's own.
pub fn recent_edits(
    products: &[Product],
    warehouseman_id: WarehousemanId,
    limit: usize,
) -> Vec<Product> {
    let mut edited: Vec<&Product> = products
        .iter()
        .filter(|product| product.edited_by_warehouseman(warehouseman_id))
        .collect();

    // Unparseable heads compare as None, which sorts after every timestamp.
    edited.sort_by_key(|product| std::cmp::Reverse(head_timestamp(product)));

    edited.into_iter().take(limit).cloned().collect()
}

fn head_timestamp(product: &Product) -> Option<DateTime<Utc>> {
    product.last_edit().and_then(|edit| edit.timestamp())
}
