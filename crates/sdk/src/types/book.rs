//! Aggregated order book for one trading instrument.
//!
//! Levels are indexed from 0 at the best price: descending prices on the bid
//! side, ascending on the ask side. Only non-empty quotes are stored, so an
//! index says nothing about the distance from the best price in minimum
//! steps.

use serde::{Deserialize, Serialize};

use super::decimal::Decimal;
use super::order::{Amount, Order, Price, Side};
use super::quote::{default_quote_price, Quote};
use super::snapshot::OrdersSnapshot;
use super::time::Microseconds;

/// Read-only aggregate of all resting orders for one instrument.
///
/// The simulator rebuilds the level vectors on every book update and hands
/// the book to the strategy through
/// [`Strategy::on_book_update`](crate::strategy::Strategy::on_book_update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    quotes: [Vec<Quote>; 2],
    depth: usize,
    min_step: Price,
    server_time: Microseconds,
    book_updates_count: u64,
    // Rebuilt alongside the levels on every update; not part of the wire
    // representation of the book itself.
    #[serde(skip)]
    orders: OrdersSnapshot,
}

impl OrderBook {
    /// Create an empty book with the given visible depth and minimum price
    /// step (the least possible difference between prices).
    pub fn new(depth: usize, min_step: Price) -> Self {
        debug_assert!(min_step > Decimal::ZERO, "min_step must be positive");
        Self {
            quotes: [Vec::new(), Vec::new()],
            depth,
            min_step,
            server_time: Microseconds::zero(),
            book_updates_count: 0,
            orders: OrdersSnapshot::new(),
        }
    }

    /// Engine-side: replace both sides with fresh levels.
    ///
    /// Levels are sorted best-first (descending bid prices, ascending ask
    /// prices) and truncated to the visible depth.
    pub fn apply_levels(&mut self, bids: Vec<Quote>, asks: Vec<Quote>, server_time: Microseconds) {
        let mut bids = bids;
        let mut asks = asks;
        bids.sort_by(|a, b| b.price().cmp(&a.price()));
        asks.sort_by(|a, b| a.price().cmp(&b.price()));
        bids.truncate(self.depth);
        asks.truncate(self.depth);
        self.quotes = [bids, asks];
        self.server_time = server_time;
        self.book_updates_count += 1;
    }

    /// Quote at `index` on `side`, best price first. `None` past the last
    /// non-empty level.
    #[inline]
    pub fn quote_by_index(&self, side: Side, index: usize) -> Option<&Quote> {
        self.quotes[side.index()].get(index)
    }

    /// Price of the quote at `index`; [`default_quote_price`] when absent.
    #[inline]
    pub fn price_by_index(&self, side: Side, index: usize) -> Price {
        self.quote_by_index(side, index)
            .map_or_else(|| default_quote_price(side), Quote::price)
    }

    /// Volume of the quote at `index`; zero when absent.
    #[inline]
    pub fn volume_by_index(&self, side: Side, index: usize) -> Amount {
        self.quote_by_index(side, index).map_or(0, Quote::volume)
    }

    /// Quote with the given price, if that level exists.
    pub fn quote_by_price(&self, side: Side, price: Price) -> Option<&Quote> {
        self.index_by_price(side, price)
            .and_then(|index| self.quote_by_index(side, index))
    }

    /// Index of the level with the given price, or `None` if no such level.
    pub fn index_by_price(&self, side: Side, price: Price) -> Option<usize> {
        self.quotes[side.index()]
            .iter()
            .position(|quote| quote.price() == price)
    }

    /// Volume at the given price; zero when the level does not exist.
    #[inline]
    pub fn volume_by_price(&self, side: Side, price: Price) -> Amount {
        self.quote_by_price(side, price).map_or(0, Quote::volume)
    }

    /// Best price on `side`; [`default_quote_price`] for an empty side.
    #[inline]
    pub fn best_price(&self, side: Side) -> Price {
        self.price_by_index(side, 0)
    }

    /// Volume at the best price on `side`.
    #[inline]
    pub fn best_volume(&self, side: Side) -> Amount {
        self.volume_by_index(side, 0)
    }

    /// Iterate over all non-empty quotes on `side`, best price first.
    pub fn all_quotes(&self, side: Side) -> impl Iterator<Item = &Quote> {
        self.quotes[side.index()].iter()
    }

    /// Number of non-empty quotes on `side`.
    #[inline]
    pub fn quotes_count(&self, side: Side) -> usize {
        self.quotes[side.index()].len()
    }

    /// Maximum number of visible levels per side.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Server time of the latest book update, in microseconds.
    #[inline]
    pub fn server_time(&self) -> Microseconds {
        self.server_time
    }

    /// Half-sum of the best prices in both directions.
    pub fn middle_price(&self) -> Price {
        (self.best_price(Side::Bid) + self.best_price(Side::Ask)) / 2i64
    }

    /// Minimum price step of the instrument.
    #[inline]
    pub fn min_step(&self) -> Price {
        self.min_step
    }

    /// Distance between the best bid and best ask in minimum steps.
    pub fn spread_in_min_steps(&self) -> usize {
        let spread = self.best_price(Side::Ask) - self.best_price(Side::Bid);
        spread.integer_division(self.min_step).max(0) as usize
    }

    /// Snapshot of the strategy's own orders, rebuilt before every update
    /// and fixed while a single callback runs.
    #[inline]
    pub fn orders(&self) -> &OrdersSnapshot {
        &self.orders
    }

    /// Engine-side: install the own-orders snapshot for the next callback.
    pub fn set_orders(&mut self, orders: OrdersSnapshot) {
        self.orders = orders;
    }

    /// Lots queued before `order` in the quote at its price.
    ///
    /// The strategy's own orders keep their placement order, so everything
    /// at the level except the order itself and own orders placed after it
    /// counts as ahead.
    pub fn amount_before_order(&self, order: &Order) -> Amount {
        let level = self.volume_by_price(order.side(), order.price());
        let own_at_or_after: Amount = self
            .orders
            .orders_by_side(order.side())
            .iter()
            .filter(|own| {
                own.price() == order.price() && own.server_time() >= order.server_time()
            })
            .map(|own| own.amount_rest())
            .sum();
        (level - own_at_or_after).max(0)
    }

    /// Number of book updates since the start of the trading session.
    ///
    /// Watching how fast this grows is a cheap measure of market activity.
    #[inline]
    pub fn book_updates_count(&self) -> u64 {
        self.book_updates_count
    }
}
