//! Client-side filtering and sorting of the product list.

use std::cmp::Ordering;

use crate::models::{Product, WarehouseId};

pub const ALL_TYPES: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Price,
    Quantity,
    Supplier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    /// `"all"` selects every type.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case(ALL_TYPES) {
            TypeFilter::All
        } else {
            TypeFilter::Only(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: String,
    pub product_type: TypeFilter,
    /// Keeps only products holding a stock entry at this warehouse.
    pub warehouse: Option<WarehouseId>,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

impl ProductQuery {
    /// Picking the active key again flips the order; a new key starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_by == key {
            self.order = self.order.flipped();
        } else {
            self.sort_by = key;
            self.order = SortOrder::Asc;
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || [&product.name, &product.product_type, &product.supplier]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));

        let matches_type = match &self.product_type {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => &product.product_type == wanted,
        };

        let matches_warehouse = self
            .warehouse
            .map_or(true, |warehouse_id| product.stock_for(warehouse_id).is_some());

        matches_search && matches_type && matches_warehouse
    }

    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut selected: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        selected.sort_by(|a, b| {
            let ordering = compare(self.sort_by, a, b);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        selected
    }
}

fn compare(key: SortKey, a: &Product, b: &Product) -> Ordering {
    match key {
        SortKey::Name => compare_text(&a.name, &b.name),
        SortKey::Price => a.price.cmp(&b.price),
        SortKey::Quantity => a.total_quantity().cmp(&b.total_quantity()),
        SortKey::Supplier => compare_text(&a.supplier, &b.supplier),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// `"all"` followed by each distinct product type in first-seen order.
pub fn product_types(products: &[Product]) -> Vec<String> {
    let mut types = vec![ALL_TYPES.to_string()];
    for product in products {
        if !types.contains(&product.product_type) {
            types.push(product.product_type.clone());
        }
    }
    types
}
