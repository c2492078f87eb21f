//! Order item entity.

use chrono::NaiveDate;
use common::{ItemId, OrderId, ProductId};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::order::payload::{self, non_negative_int, non_negative_number, optional_int, positive_int};

/// A single product line within an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    /// Store-assigned identifier; `None` until the item is persisted.
    pub id: Option<ItemId>,

    /// Product this line refers to.
    pub product_id: ProductId,

    /// Number of units ordered; always at least one.
    pub quantity: u32,

    /// Price per unit.
    pub price: f64,

    /// Owning order. Set by the core when the item is attached; a payload
    /// value is parsed for round-trips but never moves an item between
    /// orders.
    pub order_id: Option<OrderId>,

    /// Date the item was created; never changes.
    pub created_on: NaiveDate,

    /// Date of the last successful write.
    pub updated_on: NaiveDate,
}

impl OrderItem {
    /// Validates an untyped payload and materializes an item from it.
    ///
    /// `product_id`, `quantity`, and `price` are required; `product_id` must
    /// be a non-negative integer, `quantity` a strictly positive integer,
    /// and `price` a non-negative number.
    pub fn deserialize(data: &Value) -> Result<Self, ValidationError> {
        let map = payload::as_object(data)?;

        let id = optional_int(map, "id")?.map(ItemId::new);
        let product_id = ProductId::new(non_negative_int(map, "product_id")?);
        let quantity =
            u32::try_from(positive_int(map, "quantity")?).map_err(|_| {
                ValidationError::InvalidField {
                    field: "quantity",
                    expected: "a positive integer",
                }
            })?;
        let price = non_negative_number(map, "price")?;
        let order_id = optional_int(map, "order_id")?.map(OrderId::new);

        let today = payload::today();
        Ok(Self {
            id,
            product_id,
            quantity,
            price,
            order_id,
            created_on: today,
            updated_on: today,
        })
    }
}
