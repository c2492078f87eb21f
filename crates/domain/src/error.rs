//! Domain error types.

use common::{ItemId, OrderId};
use thiserror::Error;

use crate::order::OrderStatus;
use crate::store::StoreError;

/// Errors raised while validating an untyped request payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The payload was not a JSON object.
    #[error("body of request contained bad or no data")]
    BadPayload,

    /// A required field was absent.
    #[error("missing {0}")]
    MissingField(&'static str),

    /// A field was present but had the wrong type or an out-of-range value.
    #[error("{field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// The status field named something outside the fixed set.
    #[error("invalid attribute '{0}'")]
    InvalidAttribute(String),
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The request payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced order does not exist.
    #[error("Order with id '{0}' was not found.")]
    OrderNotFound(OrderId),

    /// The referenced item does not exist, or belongs to a different order.
    #[error("Item with id '{0}' was not found.")]
    ItemNotFound(ItemId),

    /// Cancel was requested for an order that is already cancelled.
    #[error("Order with id '{0}' is already cancelled.")]
    AlreadyCancelled(OrderId),

    /// Cancel was requested for an order already in transit or delivered.
    #[error("Order with id '{id}' is {status}, request conflicted.")]
    CancelConflict { id: OrderId, status: OrderStatus },

    /// A list request named a status outside the fixed set.
    #[error("Invalid status '{0}'.")]
    InvalidStatusFilter(String),

    /// An error occurred in the storage backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_id() {
        let err = DomainError::OrderNotFound(OrderId::new(17));
        assert_eq!(err.to_string(), "Order with id '17' was not found.");

        let err = DomainError::ItemNotFound(ItemId::new(3));
        assert_eq!(err.to_string(), "Item with id '3' was not found.");
    }

    #[test]
    fn conflict_messages_are_distinct() {
        let already = DomainError::AlreadyCancelled(OrderId::new(5));
        assert_eq!(already.to_string(), "Order with id '5' is already cancelled.");

        let shipped = DomainError::CancelConflict {
            id: OrderId::new(5),
            status: OrderStatus::Shipped,
        };
        assert_eq!(
            shipped.to_string(),
            "Order with id '5' is SHIPPED, request conflicted."
        );
    }

    #[test]
    fn invalid_status_filter_message() {
        let err = DomainError::InvalidStatusFilter("unknown".to_string());
        assert_eq!(err.to_string(), "Invalid status 'unknown'.");
    }

    #[test]
    fn validation_messages() {
        assert_eq!(
            ValidationError::BadPayload.to_string(),
            "body of request contained bad or no data"
        );
        assert_eq!(
            ValidationError::MissingField("customer_id").to_string(),
            "missing customer_id"
        );
        assert_eq!(
            ValidationError::InvalidField {
                field: "quantity",
                expected: "a positive integer"
            }
            .to_string(),
            "quantity must be a positive integer"
        );
        assert_eq!(
            ValidationError::InvalidAttribute("PENDING".to_string()).to_string(),
            "invalid attribute 'PENDING'"
        );
    }
}
