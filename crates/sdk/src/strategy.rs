//! Strategy trait and the action-buffering context.
//!
//! A strategy never talks to the matching engine directly: callbacks receive
//! a [`StrategyContext`], order requests and chart points are buffered there,
//! and the engine drains the buffers after the callback returns. All
//! callbacks are synchronous.

use crate::types::book::OrderBook;
use crate::types::deal::{Deal, ExecutionReport};
use crate::types::decimal::Decimal;
use crate::types::order::{
    Amount, OrderId, Price, Side, MAX_PRICE, MAX_TOTAL_AMOUNT, MIN_PRICE, MIN_STOP_LOSS_RESULT,
};
use crate::types::time::Microseconds;

/// Which Y axis a chart line is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartYAxisType {
    Left,
    Right,
}

/// One point of a named chart line, timestamped with the server time it was
/// added at. Adjacent points of the same line are connected by the viewer.
#[derive(Debug, Clone)]
pub struct ChartPoint {
    pub line: String,
    pub value: Decimal,
    pub y_axis: ChartYAxisType,
    pub chart_number: u8,
    pub server_time: Microseconds,
}

/// Actions a strategy can request during a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Place a limit order that rests in the book.
    AddLimit {
        side: Side,
        price: Price,
        amount: Amount,
    },
    /// Place an immediate-or-cancel order.
    AddIoc {
        side: Side,
        price: Price,
        amount: Amount,
    },
    /// Request deletion of one of the strategy's orders.
    Delete { order_id: OrderId },
    /// Request deletion of every order on one side.
    DeleteAllAtSide { side: Side },
    /// Request deletion of every order on one side at one price.
    DeleteAllAtPrice { side: Side, price: Price },
}

/// Context handed to every strategy callback.
///
/// Order requests are validated up front (positive amount, price strictly
/// inside the allowed band) and buffered; the engine drains them after the
/// callback returns, so a strategy observes a consistent snapshot while it
/// decides.
#[derive(Debug)]
pub struct StrategyContext {
    actions: Vec<OrderAction>,
    chart_points: Vec<ChartPoint>,
    server_time: Microseconds,
    executed_amount: Amount,
    current_result: Decimal,
    max_total_amount: Amount,
    stop_loss_result: Decimal,
}

impl StrategyContext {
    pub fn new(server_time: Microseconds) -> Self {
        Self {
            actions: Vec::new(),
            chart_points: Vec::new(),
            server_time,
            executed_amount: 0,
            current_result: Decimal::ZERO,
            max_total_amount: MAX_TOTAL_AMOUNT,
            stop_loss_result: MIN_STOP_LOSS_RESULT,
        }
    }

    fn valid_request(&self, side: Side, price: Price, amount: Amount) -> bool {
        if amount <= 0 || amount > self.max_total_amount {
            tracing::warn!(?side, %price, amount, "order rejected: bad amount");
            return false;
        }
        if price <= MIN_PRICE || price >= MAX_PRICE {
            tracing::warn!(?side, %price, amount, "order rejected: price out of band");
            return false;
        }
        true
    }

    /// Buffer a limit order. Returns whether the request passed validation.
    pub fn add_limit_order(&mut self, side: Side, price: Price, amount: Amount) -> bool {
        if !self.valid_request(side, price, amount) {
            return false;
        }
        self.actions.push(OrderAction::AddLimit {
            side,
            price,
            amount,
        });
        true
    }

    /// Buffer an immediate-or-cancel order. Returns whether the request
    /// passed validation.
    pub fn add_ioc_order(&mut self, side: Side, price: Price, amount: Amount) -> bool {
        if !self.valid_request(side, price, amount) {
            return false;
        }
        self.actions.push(OrderAction::AddIoc {
            side,
            price,
            amount,
        });
        true
    }

    /// Buffer a deletion request for one order. Deletion is not instant: the
    /// order stays visible until the engine confirms it.
    pub fn delete_order(&mut self, order_id: OrderId) {
        self.actions.push(OrderAction::Delete { order_id });
    }

    /// Buffer a deletion request for every order on `side`.
    pub fn delete_all_orders_at_side(&mut self, side: Side) {
        self.actions.push(OrderAction::DeleteAllAtSide { side });
    }

    /// Buffer a deletion request for every order on `side` at `price`.
    pub fn delete_all_orders_at_price(&mut self, side: Side, price: Price) {
        self.actions.push(OrderAction::DeleteAllAtPrice { side, price });
    }

    /// Add a point to the chart named `line` at the current server time.
    pub fn add_chart_point(
        &mut self,
        line: impl Into<String>,
        value: Decimal,
        y_axis: ChartYAxisType,
        chart_number: u8,
    ) {
        self.chart_points.push(ChartPoint {
            line: line.into(),
            value,
            y_axis,
            chart_number,
            server_time: self.server_time,
        });
    }

    /// Current server time, in microseconds.
    #[inline]
    pub fn server_time(&self) -> Microseconds {
        self.server_time
    }

    /// Current position: only executed orders are counted, signed positive
    /// for net bought lots.
    #[inline]
    pub fn executed_amount(&self) -> Amount {
        self.executed_amount
    }

    /// Current result of the strategy, with active orders assumed executed
    /// at the opposite best price.
    #[inline]
    pub fn current_result(&self) -> Decimal {
        self.current_result
    }

    /// Cap the absolute position the engine lets the strategy build.
    /// Clamped into `0..=MAX_TOTAL_AMOUNT`.
    pub fn set_max_total_amount(&mut self, max_total_amount: Amount) {
        self.max_total_amount = max_total_amount.clamp(0, MAX_TOTAL_AMOUNT);
    }

    #[inline]
    pub fn max_total_amount(&self) -> Amount {
        self.max_total_amount
    }

    /// Result at which the engine liquidates the position and stops the
    /// strategy. Non-positive; clamped below at `MIN_STOP_LOSS_RESULT`.
    pub fn set_stop_loss_result(&mut self, stop_loss_result: Decimal) {
        self.stop_loss_result = stop_loss_result.clamp(MIN_STOP_LOSS_RESULT, Decimal::ZERO);
    }

    #[inline]
    pub fn stop_loss_result(&self) -> Decimal {
        self.stop_loss_result
    }

    /// Engine-side: advance the clock before a callback.
    pub fn set_server_time(&mut self, server_time: Microseconds) {
        self.server_time = server_time;
    }

    /// Engine-side: account an execution against the position.
    pub fn record_execution(&mut self, side: Side, amount: Amount) {
        self.executed_amount += side.sign() as Amount * amount;
    }

    /// Engine-side: publish the freshly computed result.
    pub fn set_current_result(&mut self, result: Decimal) {
        self.current_result = result;
    }

    /// Number of buffered order actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Drain buffered order actions, clearing the buffer.
    pub fn drain_actions(&mut self) -> Vec<OrderAction> {
        std::mem::take(&mut self.actions)
    }

    /// Drain buffered chart points, clearing the buffer.
    pub fn drain_chart_points(&mut self) -> Vec<ChartPoint> {
        std::mem::take(&mut self.chart_points)
    }
}

/// A contest strategy. All callbacks are synchronous and default to doing
/// nothing, so an implementation only overrides what it reacts to.
pub trait Strategy: Send + 'static {
    /// Called after a new order book of the trading instrument arrives.
    fn on_book_update(&mut self, _ctx: &mut StrategyContext, _book: &OrderBook) {}

    /// Called after new deals on the trading instrument.
    fn on_deals(&mut self, _ctx: &mut StrategyContext, _deals: &[Deal]) {}

    /// Called after a report on one of the strategy's own executions.
    fn on_execution_report(&mut self, _ctx: &mut StrategyContext, _report: &ExecutionReport) {}
}
