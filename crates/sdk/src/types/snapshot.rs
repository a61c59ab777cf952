//! Snapshot of the strategy's own orders.
//!
//! Rebuilt by the simulator before every update delivered to the strategy
//! and unchanged while a single callback runs. Orders with `Adding` or
//! `Active` status are listed; orders with `Deleting` status only contribute
//! to [`OrdersSnapshot::deleting_amount_by_side`].

use std::collections::BTreeMap;
use std::sync::Arc;

use super::order::{Amount, Order, OrderStatus, Price, Side};

/// The strategy's resting orders at one moment, grouped by side.
#[derive(Debug, Clone, Default)]
pub struct OrdersSnapshot {
    orders: [Vec<Arc<Order>>; 2],
    deleting_amount: [Amount; 2],
}

impl OrdersSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine-side: replace the snapshot contents from the full set of the
    /// strategy's orders, in placement order.
    pub fn rebuild<'a>(&mut self, orders: impl IntoIterator<Item = &'a Arc<Order>>) {
        self.orders = [Vec::new(), Vec::new()];
        self.deleting_amount = [0, 0];
        for order in orders {
            match order.status() {
                OrderStatus::Adding | OrderStatus::Active => {
                    self.orders[order.side().index()].push(Arc::clone(order));
                }
                OrderStatus::Deleting => {
                    self.deleting_amount[order.side().index()] += order.amount_rest();
                }
                OrderStatus::Deleted => {}
            }
        }
    }

    /// Total unmatched volume of the orders on `side` at `price`.
    pub fn volume(&self, side: Side, price: Price) -> Amount {
        self.orders[side.index()]
            .iter()
            .filter(|order| order.price() == price)
            .map(|order| order.amount_rest())
            .sum()
    }

    /// Number of orders on `side` (adding and active).
    #[inline]
    pub fn size_by_side(&self, side: Side) -> usize {
        self.orders[side.index()].len()
    }

    /// Number of orders on `side` with `Active` status.
    pub fn active_orders_count(&self, side: Side) -> usize {
        self.orders[side.index()]
            .iter()
            .filter(|order| order.status() == OrderStatus::Active)
            .count()
    }

    /// Total unmatched volume of the orders on `side` with `Active` status.
    pub fn active_orders_volume(&self, side: Side) -> Amount {
        self.orders[side.index()]
            .iter()
            .filter(|order| order.status() == OrderStatus::Active)
            .map(|order| order.amount_rest())
            .sum()
    }

    /// The orders on `side`, in placement order.
    #[inline]
    pub fn orders_by_side(&self, side: Side) -> &[Arc<Order>] {
        &self.orders[side.index()]
    }

    /// The orders on `side` grouped by price, ascending.
    pub fn orders_by_side_as_map(&self, side: Side) -> BTreeMap<Price, Vec<Arc<Order>>> {
        let mut map: BTreeMap<Price, Vec<Arc<Order>>> = BTreeMap::new();
        for order in &self.orders[side.index()] {
            map.entry(order.price()).or_default().push(Arc::clone(order));
        }
        map
    }

    /// Volume sent to deletion on `side` but not removed from the market yet.
    #[inline]
    pub fn deleting_amount_by_side(&self, side: Side) -> Amount {
        self.deleting_amount[side.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::order::OrderId;
    use crate::types::time::Microseconds;

    fn order(id: u64, side: Side, price: f64, amount: Amount, status: OrderStatus) -> Arc<Order> {
        Arc::new(Order::new(
            OrderId(id),
            side,
            Price::from_f64(price),
            amount,
            Microseconds::new(id as i64 * 10),
            status,
        ))
    }

    fn sample_snapshot() -> OrdersSnapshot {
        let orders = vec![
            order(1, Side::Bid, 99.5, 3, OrderStatus::Active),
            order(2, Side::Bid, 99.5, 2, OrderStatus::Adding),
            order(3, Side::Bid, 99.0, 4, OrderStatus::Active),
            order(4, Side::Bid, 98.5, 5, OrderStatus::Deleting),
            order(5, Side::Ask, 101.0, 1, OrderStatus::Active),
            order(6, Side::Ask, 102.0, 7, OrderStatus::Deleted),
        ];
        let mut snapshot = OrdersSnapshot::new();
        snapshot.rebuild(&orders);
        snapshot
    }

    #[test]
    fn test_only_adding_and_active_are_listed() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.size_by_side(Side::Bid), 3);
        assert_eq!(snapshot.size_by_side(Side::Ask), 1);
    }

    #[test]
    fn test_volume_sums_rest_at_price() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.volume(Side::Bid, Price::from_f64(99.5)), 5);
        assert_eq!(snapshot.volume(Side::Bid, Price::from_f64(99.0)), 4);
        assert_eq!(snapshot.volume(Side::Bid, Price::from_f64(97.0)), 0);
    }

    #[test]
    fn test_active_counts_exclude_adding() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.active_orders_count(Side::Bid), 2);
        assert_eq!(snapshot.active_orders_volume(Side::Bid), 7);
        assert_eq!(snapshot.active_orders_count(Side::Ask), 1);
    }

    #[test]
    fn test_deleting_amount_tracked_separately() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.deleting_amount_by_side(Side::Bid), 5);
        assert_eq!(snapshot.deleting_amount_by_side(Side::Ask), 0);
        // Deleting orders are not listed among the resting ones.
        assert_eq!(snapshot.volume(Side::Bid, Price::from_f64(98.5)), 0);
    }

    #[test]
    fn test_orders_keep_placement_order() {
        let snapshot = sample_snapshot();
        let ids: Vec<u64> = snapshot
            .orders_by_side(Side::Bid)
            .iter()
            .map(|order| order.id().0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_map_is_ordered_by_price_ascending() {
        let snapshot = sample_snapshot();
        let map = snapshot.orders_by_side_as_map(Side::Bid);
        let prices: Vec<Price> = map.keys().copied().collect();
        assert_eq!(
            prices,
            vec![
                Price::from_f64(99.0),
                Price::from_f64(99.5)
            ]
        );
        assert_eq!(map[&Price::from_f64(99.5)].len(), 2);
    }

    #[test]
    fn test_rebuild_replaces_previous_contents() {
        let mut snapshot = sample_snapshot();
        snapshot.rebuild(&[order(9, Side::Ask, 103.0, 2, OrderStatus::Active)]);
        assert_eq!(snapshot.size_by_side(Side::Bid), 0);
        assert_eq!(snapshot.size_by_side(Side::Ask), 1);
        assert_eq!(snapshot.deleting_amount_by_side(Side::Bid), 0);
    }
}
