//! # arena-sdk
//!
//! Contestant SDK for the TradeArena trading competition.
//!
//! This crate provides everything a strategy links against: the fixed-point
//! [`Decimal`](types::Decimal) price arithmetic, the allocation-light
//! [`TextStream`](encoder::TextStream) byte formatter, lazy typed access to
//! JSON strategy configs via [`ConfigView`](config::ConfigView), the market
//! entities the simulator delivers (orders, quotes, deals, order books), and
//! the [`Strategy`](strategy::Strategy) callback trait with its
//! action-buffering context.

pub mod config;
pub mod encoder;
pub mod logging;
pub mod strategy;
pub mod types;

pub use config::{ConfigDoc, ConfigView};
pub use encoder::{to_text, Encode, TextStream};
pub use strategy::{Strategy, StrategyContext};
pub use types::{Amount, Decimal, Deal, ExecutionReport, Order, OrderBook, Price, Quote, Side};
