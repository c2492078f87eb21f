//! Query model for order listings.

use common::{CustomerId, ProductId};

use crate::error::DomainError;
use crate::order::status::OrderStatus;

/// Predicate set for scanning orders.
///
/// Every predicate that is set must hold for an order to match. An order
/// matches the product predicate when it owns at least one item for that
/// product.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrderQuery {
    pub customer_id: Option<CustomerId>,
    pub status: Option<OrderStatus>,
    pub product_id: Option<ProductId>,
}

impl OrderQuery {
    /// Creates an empty query matching every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the query to orders placed by a customer.
    pub fn customer_id(mut self, id: CustomerId) -> Self {
        self.customer_id = Some(id);
        self
    }

    /// Restricts the query to orders in a status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the query to orders owning an item for a product.
    pub fn product_id(mut self, id: ProductId) -> Self {
        self.product_id = Some(id);
        self
    }
}

/// The single filter applied to a list request.
///
/// When a request supplies several criteria, `customer_id` takes priority
/// over `status`, which takes priority over `product_id`; the losers are
/// ignored entirely. Filters are never combined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListFilter {
    All,
    Customer(CustomerId),
    Status(OrderStatus),
    Product(ProductId),
}

impl ListFilter {
    /// Resolves raw request parameters into the one filter to apply.
    ///
    /// A status name outside the fixed five fails the request, but only
    /// when the status filter is the one selected.
    pub fn resolve(
        customer_id: Option<i64>,
        status: Option<&str>,
        product_id: Option<i64>,
    ) -> Result<Self, DomainError> {
        if let Some(id) = customer_id {
            return Ok(ListFilter::Customer(CustomerId::new(id)));
        }
        if let Some(name) = status {
            let status = OrderStatus::from_name(name)
                .ok_or_else(|| DomainError::InvalidStatusFilter(name.to_string()))?;
            return Ok(ListFilter::Status(status));
        }
        if let Some(id) = product_id {
            return Ok(ListFilter::Product(ProductId::new(id)));
        }
        Ok(ListFilter::All)
    }

    /// Lowers the filter into a store query.
    pub fn into_query(self) -> OrderQuery {
        match self {
            ListFilter::All => OrderQuery::new(),
            ListFilter::Customer(id) => OrderQuery::new().customer_id(id),
            ListFilter::Status(status) => OrderQuery::new().status(status),
            ListFilter::Product(id) => OrderQuery::new().product_id(id),
        }
    }
}
