//! Order-related declarations: sides, statuses, identifiers, limits, and the
//! order description handed to strategies.
//!
//! The matching engine that creates and advances orders lives in the external
//! simulator; this module only describes the data crossing that boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::decimal::Decimal;
use super::time::Microseconds;

/// Price of an order, quote or deal.
pub type Price = Decimal;

/// Volume in whole lots.
pub type Amount = i32;

/// Lowest representable price; also the placeholder for an absent bid quote.
pub const MIN_PRICE: Price = Decimal::from_numerator(0);

/// Highest representable price; also the placeholder for an absent ask quote.
pub const MAX_PRICE: Price = Decimal::from_numerator(100_000_000 * 10_000_000);

/// Largest position the simulator allows a strategy to request.
pub const MAX_TOTAL_AMOUNT: Amount = 100;

/// Lowest stop-loss result the simulator accepts.
pub const MIN_STOP_LOSS_RESULT: Decimal = Decimal::from_numerator(-100_000 * 10_000_000);

/// Unique numeric identifier assigned to an order during a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of deals, orders and quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Purchase; the buy half of the book.
    Bid,
    /// Sale; the sell half of the book.
    Ask,
}

impl Side {
    /// Returns the opposite direction.
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// Direction sign: `1` for bid, `-1` for ask.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Side::Bid => 1,
            Side::Ask => -1,
        }
    }

    /// Array index for per-side storage: bid is 0, ask is 1.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "BID"),
            Side::Ask => write!(f, "ASK"),
        }
    }
}

/// Lifecycle state of an order.
///
/// `Adding` and `Deleting` cover the round-trip delay between a request and
/// its effect on the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created but not placed yet (addition round-trip in flight).
    Adding,
    /// Placed on the market.
    Active,
    /// Deletion requested but not executed yet.
    Deleting,
    /// Removed from the market.
    Deleted,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Adding => write!(f, "Adding"),
            OrderStatus::Active => write!(f, "Active"),
            OrderStatus::Deleting => write!(f, "Deleting"),
            OrderStatus::Deleted => write!(f, "Deleted"),
        }
    }
}

/// Description of a market order.
///
/// Strategies only read orders; the simulator constructs them and advances
/// `amount_rest`/`status` as matches and deletions happen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    price: Price,
    amount: Amount,
    amount_rest: Amount,
    status: OrderStatus,
    server_time: Microseconds,
}

impl Order {
    /// Build an order as the simulator would, with the full amount resting.
    pub fn new(
        id: OrderId,
        side: Side,
        price: Price,
        amount: Amount,
        server_time: Microseconds,
        status: OrderStatus,
    ) -> Self {
        Self {
            id,
            side,
            price,
            amount,
            amount_rest: amount,
            status,
            server_time,
        }
    }

    /// Unique numeric identifier received during the simulation.
    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Direction of the order.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Price of the order.
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Initial volume in lots.
    #[inline]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Lots not yet matched with other orders.
    #[inline]
    pub fn amount_rest(&self) -> Amount {
        self.amount_rest
    }

    /// Current lifecycle status.
    #[inline]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Server time when the order was placed, in microseconds.
    #[inline]
    pub fn server_time(&self) -> Microseconds {
        self.server_time
    }

    /// Engine-side: record a partial or full match of `amount` lots.
    pub fn execute(&mut self, amount: Amount) {
        self.amount_rest = (self.amount_rest - amount).max(0);
        if self.amount_rest == 0 {
            self.status = OrderStatus::Deleted;
        }
    }

    /// Engine-side: move the order to a new lifecycle status.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order::new(
            OrderId(7),
            Side::Bid,
            Price::from(100),
            5,
            Microseconds::new(1_000),
            OrderStatus::Active,
        )
    }

    #[test]
    fn test_side_opposite_and_sign() {
        assert_eq!(Side::Bid.opposite(), Side::Ask);
        assert_eq!(Side::Ask.opposite(), Side::Bid);
        assert_eq!(Side::Bid.sign(), 1);
        assert_eq!(Side::Ask.sign(), -1);
        assert_eq!(Side::Bid.index(), 0);
        assert_eq!(Side::Ask.index(), 1);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::Bid.to_string(), "BID");
        assert_eq!(Side::Ask.to_string(), "ASK");
    }

    #[test]
    fn test_order_accessors() {
        let order = sample_order();
        assert_eq!(order.id(), OrderId(7));
        assert_eq!(order.side(), Side::Bid);
        assert_eq!(order.price(), Price::from(100));
        assert_eq!(order.amount(), 5);
        assert_eq!(order.amount_rest(), 5);
        assert_eq!(order.status(), OrderStatus::Active);
        assert_eq!(order.server_time(), Microseconds::new(1_000));
    }

    #[test]
    fn test_order_execute_reduces_rest() {
        let mut order = sample_order();
        order.execute(2);
        assert_eq!(order.amount_rest(), 3);
        assert_eq!(order.amount(), 5);
        assert_eq!(order.status(), OrderStatus::Active);
    }

    #[test]
    fn test_order_fully_executed_is_deleted() {
        let mut order = sample_order();
        order.execute(5);
        assert_eq!(order.amount_rest(), 0);
        assert_eq!(order.status(), OrderStatus::Deleted);
    }

    #[test]
    fn test_price_limits_ordering() {
        assert!(MIN_PRICE < MAX_PRICE);
        assert_eq!(MIN_PRICE, Price::from(0));
        assert_eq!(MAX_PRICE, Price::from(100_000_000));
    }
}
