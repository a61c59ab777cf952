//! Deals and execution reports delivered to strategies.

use std::sync::Arc;

use super::order::{Amount, Order, Price, Side};
use super::time::Microseconds;

/// A match between two orders.
///
/// Both matched orders are shared with the rest of the simulation, so they
/// are held through [`Arc`]; the bid order is at index 0 and the ask order at
/// index 1.
#[derive(Debug, Clone)]
pub struct Deal {
    aggressor_side: Side,
    price: Price,
    amount: Amount,
    server_time: Microseconds,
    orders: [Arc<Order>; 2],
}

impl Deal {
    /// Build a deal as the simulator would after matching `order_bid`
    /// against `order_ask`.
    pub fn new(
        aggressor_side: Side,
        price: Price,
        amount: Amount,
        server_time: Microseconds,
        order_bid: Arc<Order>,
        order_ask: Arc<Order>,
    ) -> Self {
        Self {
            aggressor_side,
            price,
            amount,
            server_time,
            orders: [order_bid, order_ask],
        }
    }

    /// Direction of the aggressor order, i.e. the order placed later.
    #[inline]
    pub fn aggressor_side(&self) -> Side {
        self.aggressor_side
    }

    /// Price the deal executed at.
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Lots executed in this deal.
    #[inline]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Server time of the execution, in microseconds.
    #[inline]
    pub fn server_time(&self) -> Microseconds {
        self.server_time
    }

    /// The two matched orders: bid first, ask second.
    #[inline]
    pub fn orders(&self) -> &[Arc<Order>; 2] {
        &self.orders
    }
}

/// Report on a deal involving one of the strategy's own orders.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    order: Arc<Order>,
    price: Price,
    amount: Amount,
    server_time: Microseconds,
}

impl ExecutionReport {
    /// Build a report as the simulator would.
    pub fn new(order: Arc<Order>, price: Price, amount: Amount, server_time: Microseconds) -> Self {
        Self {
            order,
            price,
            amount,
            server_time,
        }
    }

    /// The strategy's order that was matched.
    #[inline]
    pub fn order(&self) -> &Arc<Order> {
        &self.order
    }

    /// Price of the deal.
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Volume of the deal.
    #[inline]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Direction of the executed order.
    #[inline]
    pub fn side(&self) -> Side {
        self.order.side()
    }

    /// Server time of the execution, in microseconds.
    #[inline]
    pub fn server_time(&self) -> Microseconds {
        self.server_time
    }
}
