//! Shared fixtures for harp tests and benches
//!
//! Domain types here serialize with PascalCase member names, which is what
//! the wrapping tests build their symbolic getters against.

#![deny(unsafe_code)]

use serde::Serialize;

/// An order with a nested customer, the standard wrapped fixture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    pub reference: String,
    pub total: i64,
    pub customer: Customer,
}

/// Nested value reached through member chains like `Customer.Name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Customer {
    pub name: String,
    pub city: String,
}

/// Marker for the orders controller; derives controller name `"Orders"`.
pub struct OrdersController;

/// Marker for the customers controller; derives controller name
/// `"Customers"`.
pub struct CustomersController;

/// Marker type without the conventional suffix; the derived controller
/// name stays `"Gateway"`.
pub struct Gateway;

/// A collection type with envelope-level state of its own, iterable over
/// its orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderBatch {
    pub batch_number: i64,
    pub orders: Vec<Order>,
}

impl<'a> IntoIterator for &'a OrderBatch {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

/// An order with the given reference and defaults everywhere else.
pub fn order(reference: &str) -> Order {
    Order {
        reference: reference.to_string(),
        total: 120,
        customer: Customer {
            name: "Ada".to_string(),
            city: "Turin".to_string(),
        },
    }
}

/// The fixture used by most wrapping tests.
pub fn sample_order() -> Order {
    order("A-1")
}

/// A batch of orders with the given references, in order.
pub fn orders(references: &[&str]) -> Vec<Order> {
    references.iter().map(|reference| order(reference)).collect()
}

/// An [`OrderBatch`] over orders with the given references.
pub fn batch(references: &[&str]) -> OrderBatch {
    OrderBatch {
        batch_number: 7,
        orders: orders(references),
    }
}
