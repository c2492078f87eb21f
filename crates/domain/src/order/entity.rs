//! Order entity.

use chrono::NaiveDate;
use common::{CustomerId, OrderId};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::order::item::OrderItem;
use crate::order::payload::{self, non_negative_int, optional_int};
use crate::order::status::OrderStatus;

/// An order placed by a customer.
///
/// Owns its items: an item's lifetime never exceeds its order's, and
/// deleting the order removes them with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    /// Store-assigned identifier; `None` until the order is persisted.
    pub id: Option<OrderId>,

    /// Customer who placed the order.
    pub customer_id: CustomerId,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Items owned by the order, in insertion order.
    pub items: Vec<OrderItem>,

    /// Date the order was created; never changes.
    pub created_on: NaiveDate,

    /// Date of the last successful write.
    pub updated_on: NaiveDate,
}

impl Order {
    /// Validates an untyped payload and materializes an order from it.
    ///
    /// `customer_id` is required and must be a non-negative integer.
    /// `status` defaults to `CONFIRMED`; a name outside the fixed five is
    /// rejected. Embedded `items` are validated through
    /// [`OrderItem::deserialize`] and any item failure propagates. An `id`
    /// in the payload is kept for round-trip and update flows; creation
    /// discards it before insertion.
    pub fn deserialize(data: &Value) -> Result<Self, ValidationError> {
        let map = payload::as_object(data)?;

        let id = optional_int(map, "id")?.map(OrderId::new);
        let customer_id = CustomerId::new(non_negative_int(map, "customer_id")?);

        let status = match map.get("status") {
            Some(value) => {
                let name = value.as_str().ok_or(ValidationError::BadPayload)?;
                OrderStatus::from_name(name)
                    .ok_or_else(|| ValidationError::InvalidAttribute(name.to_string()))?
            }
            None => OrderStatus::Confirmed,
        };

        let items = match map.get("items") {
            Some(value) => {
                let elements = value.as_array().ok_or(ValidationError::BadPayload)?;
                elements
                    .iter()
                    .map(OrderItem::deserialize)
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => Vec::new(),
        };

        let today = payload::today();
        Ok(Self {
            id,
            customer_id,
            status,
            items,
            created_on: today,
            updated_on: today,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductId;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_payload_defaults_status() {
        let order = Order::deserialize(&json!({"customer_id": 4})).unwrap();
        assert_eq!(order.id, None);
        assert_eq!(order.customer_id, CustomerId::new(4));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(order.items.is_empty());
        assert_eq!(order.updated_on, payload::today());
    }

    #[test]
    fn deserialize_rejects_non_object_payload() {
        for bad in [json!(null), json!(42), json!("order"), json!([1])] {
            assert_eq!(Order::deserialize(&bad), Err(ValidationError::BadPayload));
        }
    }

    #[test]
    fn deserialize_requires_customer_id() {
        assert_eq!(
            Order::deserialize(&json!({"status": "CONFIRMED"})),
            Err(ValidationError::MissingField("customer_id"))
        );
    }

    #[test]
    fn deserialize_rejects_bad_customer_id() {
        for bad in [json!("4"), json!(-1), json!(1.5), json!(true)] {
            let result = Order::deserialize(&json!({"customer_id": bad}));
            assert_eq!(
                result,
                Err(ValidationError::InvalidField {
                    field: "customer_id",
                    expected: "a non-negative integer"
                })
            );
        }
    }

    #[test]
    fn deserialize_accepts_each_status_name() {
        for status in OrderStatus::ALL {
            let order =
                Order::deserialize(&json!({"customer_id": 1, "status": status.as_str()})).unwrap();
            assert_eq!(order.status, status);
        }
    }

    #[test]
    fn deserialize_rejects_unknown_status() {
        assert_eq!(
            Order::deserialize(&json!({"customer_id": 1, "status": "PENDING"})),
            Err(ValidationError::InvalidAttribute("PENDING".to_string()))
        );
    }

    #[test]
    fn deserialize_validates_embedded_items() {
        let order = Order::deserialize(&json!({
            "customer_id": 2,
            "items": [{"product_id": 3, "quantity": 2, "price": 100.0}]
        }))
        .unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_id, ProductId::new(3));

        let bad = Order::deserialize(&json!({
            "customer_id": 2,
            "items": [{"product_id": 3, "quantity": 0, "price": 100.0}]
        }));
        assert_eq!(
            bad,
            Err(ValidationError::InvalidField {
                field: "quantity",
                expected: "a positive integer"
            })
        );
    }

    #[test]
    fn serialize_emits_wire_shape() {
        let order = Order::deserialize(&json!({"customer_id": 4})).unwrap();
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], json!("CONFIRMED"));
        assert_eq!(value["items"], json!([]));
        assert_eq!(value["customer_id"], json!(4));
        assert_eq!(value["created_on"], json!(payload::today().to_string()));
    }

    #[test]
    fn serialize_then_deserialize_is_stable() {
        let first = Order::deserialize(&json!({
            "customer_id": 4,
            "status": "IN_PROGRESS",
            "items": [{"product_id": 3, "quantity": 2, "price": 100.0}]
        }))
        .unwrap();

        let round_tripped =
            Order::deserialize(&serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(round_tripped, first);
    }
}
