//! Price levels of the order book.

use serde::{Deserialize, Serialize};

use super::order::{Amount, Price, Side, MAX_PRICE, MIN_PRICE};
use super::time::Microseconds;

/// Placeholder price for a quote that does not exist.
///
/// An absent bid level reads as [`MIN_PRICE`] and an absent ask level as
/// [`MAX_PRICE`], so price comparisons against a missing side of the book
/// stay well-ordered.
#[inline]
pub const fn default_quote_price(side: Side) -> Price {
    match side {
        Side::Bid => MIN_PRICE,
        Side::Ask => MAX_PRICE,
    }
}

/// A single price level: every resting order at one price on one side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    side: Side,
    price: Price,
    volume: Amount,
    server_time: Microseconds,
}

impl Quote {
    /// Build a level as the simulator's book builder would.
    pub fn new(side: Side, price: Price, volume: Amount, server_time: Microseconds) -> Self {
        Self {
            side,
            price,
            volume,
            server_time,
        }
    }

    /// Direction of the quote.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Price of the quote.
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Total lots resting in orders at this level.
    #[inline]
    pub fn volume(&self) -> Amount {
        self.volume
    }

    /// Server time of the last change to this level, in microseconds.
    #[inline]
    pub fn server_time(&self) -> Microseconds {
        self.server_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quote_price() {
        assert_eq!(default_quote_price(Side::Bid), MIN_PRICE);
        assert_eq!(default_quote_price(Side::Ask), MAX_PRICE);
    }

    #[test]
    fn test_quote_accessors() {
        let quote = Quote::new(
            Side::Ask,
            Price::from_f64(101.5),
            12,
            Microseconds::new(5_000),
        );
        assert_eq!(quote.side(), Side::Ask);
        assert_eq!(quote.price(), Price::from_f64(101.5));
        assert_eq!(quote.volume(), 12);
        assert_eq!(quote.server_time(), Microseconds::new(5_000));
    }
}
