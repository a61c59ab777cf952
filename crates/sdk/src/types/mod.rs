//! Market entities and numeric vocabulary of the SDK.
//!
//! Everything here is a plain value type: fixed-point decimals, duration
//! counts, and the order/quote/deal/book descriptions the simulator hands to
//! strategies.

pub mod book;
pub mod deal;
pub mod decimal;
pub mod order;
pub mod quote;
pub mod snapshot;
pub mod time;

// Re-export primary types for convenient access via `arena_sdk::types::*`.
pub use book::OrderBook;
pub use deal::{Deal, ExecutionReport};
pub use decimal::{stored_pow10, Decimal, NumericError};
pub use order::{
    Amount, Order, OrderId, OrderStatus, Price, Side, MAX_PRICE, MAX_TOTAL_AMOUNT, MIN_PRICE,
    MIN_STOP_LOSS_RESULT,
};
pub use quote::{default_quote_price, Quote};
pub use snapshot::OrdersSnapshot;
pub use time::{Microseconds, Milliseconds, Nanoseconds, Seconds};
