//! Domain types for ScanLab

pub mod kline;
pub mod orderbook;
pub mod snapshot;

pub use kline::Kline;
pub use orderbook::{Level, OrderBook};
pub use snapshot::{CorrelationMatrix, MarketSnapshot};
