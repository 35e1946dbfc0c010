//! Order operations
//!
//! Placing an order reserves stock and cancelling it gives the stock back. Both
//! happen in one transaction with the order write, so a rejected order leaves
//! every product untouched.

use crate::dto::{CreateOrderRequest, OrderResponse, PatchOrderRequest};
use crate::order::{Order, OrderItem, OrderStatus};
use crate::storage::SqliteStore;
use crate::validation::Validate;
use crate::{Error, Money, Result};

pub struct OrderService<'a> {
    store: &'a SqliteStore,
}

impl<'a> OrderService<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    pub fn create(&self, req: &CreateOrderRequest) -> Result<OrderResponse> {
        req.validate()?;
        let user_id = req
            .user_id
            .ok_or_else(|| Error::invalid_field("userId", "must not be null"))?;
        if !self.store.user_exists(user_id)? {
            return Err(Error::not_found("User"));
        }
        let lines = merge_lines(req)?;

        let order_id = self.store.transaction(|store| {
            let mut order = Order::new(user_id);
            let mut total = Money::ZERO;

            for (product_id, quantity) in &lines {
                let product = store
                    .get_product(*product_id)?
                    .ok_or_else(|| Error::not_found("Product"))?;
                if !product.has_stock(*quantity) {
                    tracing::warn!(
                        "Insufficient stock for product {}: requested {}, available {}",
                        product.id, quantity, product.stock
                    );
                    return Err(Error::conflict(format!(
                        "Insufficient stock for product {}",
                        product.id
                    )));
                }
                total = product
                    .price
                    .checked_mul(*quantity)
                    .and_then(|line| total.checked_add(line))
                    .ok_or_else(|| Error::BadRequest("Order total is too large".into()))?;

                store.adjust_stock(product.id, -quantity)?;
                order.items.push(OrderItem {
                    id: 0,
                    order_id: 0,
                    product_id: product.id,
                    quantity: *quantity,
                    unit_price: product.price,
                });
            }

            let order_id = store.insert_order(&order)?;
            tracing::info!("Created order {} for user {} (total {})", order_id, user_id, total);
            Ok(order_id)
        })?;

        self.get(order_id)
    }

    /// List all orders, or only those placed by `user_id`
    pub fn list(&self, user_id: Option<i64>) -> Result<Vec<OrderResponse>> {
        Ok(self.store.list_orders(user_id)?.into_iter().map(Into::into).collect())
    }

    pub fn get(&self, id: i64) -> Result<OrderResponse> {
        self.store
            .get_order(id)?
            .map(Into::into)
            .ok_or_else(|| Error::not_found("Order"))
    }

    /// Move an order to a new status. Cancelling returns the items to stock.
    pub fn patch_status(&self, id: i64, req: &PatchOrderRequest) -> Result<OrderResponse> {
        req.validate()?;
        let requested: OrderStatus = req.status.as_deref().unwrap_or_default().parse()?;

        let order = self.store.transaction(|store| {
            let mut order = store.get_order(id)?.ok_or_else(|| Error::not_found("Order"))?;
            let next = order.status.transition(requested)?;

            if next == OrderStatus::Cancelled {
                for item in &order.items {
                    store.adjust_stock(item.product_id, item.quantity)?;
                }
            }
            store.update_order_status(id, next)?;
            tracing::info!("Order {} moved from {} to {}", id, order.status, next);

            order.status = next;
            Ok(order)
        })?;

        Ok(order.into())
    }
}

/// Collapse request items into one line per product, keeping first-seen order
fn merge_lines(req: &CreateOrderRequest) -> Result<Vec<(i64, i64)>> {
    let mut lines: Vec<(i64, i64)> = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let (Some(product_id), Some(quantity)) = (item.product_id, item.quantity) else {
            return Err(Error::BadRequest("Order items need productId and quantity".into()));
        };
        match lines.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, total)) => {
                *total = total
                    .checked_add(quantity)
                    .ok_or_else(|| Error::invalid_field("items", "quantity is too large"))?;
            }
            None => lines.push((product_id, quantity)),
        }
    }
    Ok(lines)
}
