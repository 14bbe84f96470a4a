use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationErrors;
use crate::models::{EditRecord, Localisation, ProductDraft, Session, StockEntry, Warehouse};

pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/600x400?text=No+Image";

/// Raw input of the add-product flow, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub product_type: String,
    pub barcode: String,
    pub price: String,
    pub supplier: String,
    pub image: String,
    pub quantity: String,
    pub warehouse: Option<Warehouse>,
}

impl ProductForm {
    /// Checks every field and builds the draft to post. The creating
    /// warehouseman is recorded as the first entry of the edit history.
    pub fn validate(&self, session: &Session) -> Result<ProductDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(&mut errors, "name", &self.name, "Product name is required");
        let product_type = required(
            &mut errors,
            "type",
            &self.product_type,
            "Product type is required",
        );
        let barcode = required(&mut errors, "barcode", &self.barcode, "Barcode is required");
        let supplier = required(&mut errors, "supplier", &self.supplier, "Supplier is required");

        let price = required(&mut errors, "price", &self.price, "Price is required").and_then(
            |raw| match Decimal::from_str(raw) {
                Ok(price) if price > Decimal::ZERO => Some(price),
                Ok(_) => {
                    errors.add("price", "Price must be greater than zero");
                    None
                }
                Err(_) => {
                    errors.add("price", "Price must be a number");
                    None
                }
            },
        );

        let quantity = required(&mut errors, "quantity", &self.quantity, "Quantity is required")
            .and_then(|raw| match raw.parse::<u32>() {
                Ok(quantity) => Some(quantity),
                Err(_) => {
                    errors.add("quantity", "Quantity must be a number");
                    None
                }
            });

        if self.warehouse.is_none() {
            errors.add("warehouse", "Warehouse is required");
        }

        match (name, product_type, barcode, supplier, price, quantity, &self.warehouse) {
            (
                Some(name),
                Some(product_type),
                Some(barcode),
                Some(supplier),
                Some(price),
                Some(quantity),
                Some(warehouse),
            ) if errors.is_empty() => {
                let image = match self.image.trim() {
                    "" => PLACEHOLDER_IMAGE.to_string(),
                    image => image.to_string(),
                };

                Ok(ProductDraft {
                    name: name.to_string(),
                    product_type: product_type.to_string(),
                    barcode: barcode.to_string(),
                    price,
                    supplier: supplier.to_string(),
                    image,
                    stocks: vec![StockEntry {
                        id: warehouse.id,
                        name: warehouse.name.clone(),
                        quantity,
                        localisation: Localisation {
                            city: warehouse.city.clone(),
                            ..Localisation::default()
                        },
                    }],
                    edited_by: vec![EditRecord::now(session.warehouseman_id)],
                })
            }
            _ => Err(errors),
        }
    }
}

fn required<'a>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &'a str,
    message: &str,
) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, message);
        None
    } else {
        Some(value)
    }
}
