//! Single-instrument limit order book
//!
//! Layers:
//! - `domain`: fixed-point scalar, orders, the two ordered sides and the book
//! - `application`: `BookService`, a single-owner wrapper for concurrent callers
//! - `shared`: Prometheus metrics
//! - `interfaces`: the simulator CLI and its order-flow generator

pub mod domain;
pub mod application;
pub mod shared;
pub mod interfaces;

pub use domain::{Amount, Book, Depth, DepthPoint, Fills, Fixed, Order, OrderId, OrderRef, Price, Side};
