//! Tools and Utilities Module
//!
//! Helpers shared by the CLI simulator and the benchmarks.
//!
//! ## Available Tools
//! - `order_flow`: seeded synthetic order flow that drifts around the
//!   book's middle price

pub mod order_flow;

pub use order_flow::OrderFlow;
