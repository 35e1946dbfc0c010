//! Orders and their status lifecycle
//!
//! An order starts as `CREATED` and moves exactly once, either to `PAID` or to
//! `CANCELLED`. Both of those are terminal.

use crate::{Error, Money, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Placed, stock reserved, awaiting payment
    Created,
    /// Paid for
    Paid,
    /// Cancelled, stock returned
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn all() -> &'static [OrderStatus] {
        &[OrderStatus::Created, OrderStatus::Paid, OrderStatus::Cancelled]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Cancelled)
    }

    /// Check a status change, returning the new status when allowed
    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus> {
        if self.is_terminal() {
            return Err(Error::Conflict(format!(
                "Order is in terminal status {}",
                self
            )));
        }
        match (self, to) {
            (OrderStatus::Created, OrderStatus::Paid | OrderStatus::Cancelled) => Ok(to),
            _ => Err(Error::Conflict(format!(
                "Cannot change order status from {} to {}",
                self, to
            ))),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "CREATED" => Ok(OrderStatus::Created),
            "PAID" => Ok(OrderStatus::Paid),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => {
                let allowed: Vec<&str> = OrderStatus::all().iter().map(|s| s.as_str()).collect();
                Err(Error::invalid_field(
                    "status",
                    format!("must be one of {}", allowed.join(", ")),
                ))
            }
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One product line of an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Product price at the time the order was placed
    pub unit_price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.unit_price
            .checked_mul(self.quantity)
            .unwrap_or(Money::from_cents(i64::MAX))
    }
}

/// An order together with its items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    pub created_at: String,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(user_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            status: OrderStatus::Created,
            created_at: chrono::Utc::now().to_rfc3339(),
            items: Vec::new(),
        }
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!("paid".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert_eq!(" CANCELLED ".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!(matches!("SHIPPED".parse::<OrderStatus>(), Err(Error::Validation(_))));
        assert!(matches!("CANCELED".parse::<OrderStatus>(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_created_transitions() {
        assert_eq!(OrderStatus::Created.transition(OrderStatus::Paid).unwrap(), OrderStatus::Paid);
        assert_eq!(
            OrderStatus::Created.transition(OrderStatus::Cancelled).unwrap(),
            OrderStatus::Cancelled
        );
        assert!(matches!(
            OrderStatus::Created.transition(OrderStatus::Created),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn test_terminal_statuses_reject_changes() {
        for from in [OrderStatus::Paid, OrderStatus::Cancelled] {
            for to in OrderStatus::all() {
                assert!(matches!(from.transition(*to), Err(Error::Conflict(_))));
            }
        }
    }

    #[test]
    fn test_total() {
        let mut order = Order::new(1);
        order.items.push(OrderItem {
            id: 0,
            order_id: 0,
            product_id: 1,
            quantity: 2,
            unit_price: Money::from_cents(3000),
        });
        order.items.push(OrderItem {
            id: 0,
            order_id: 0,
            product_id: 2,
            quantity: 1,
            unit_price: Money::from_cents(1250),
        });
        assert_eq!(order.total(), Money::from_cents(7250));
    }
}
