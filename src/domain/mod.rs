/// Domain Layer - Core Business Logic
///
/// Pure engine logic with no I/O: the fixed-point scalar, the order entity,
/// validation rules and the order book itself. Everything here runs to
/// completion on the caller's thread and can be tested in isolation.
///
/// ## Modules
/// - `fixed`: 10^-9 fixed-point scalar used for prices, amounts and money
/// - `order`: Order entity, side and identifiers
/// - `validation`: incoming-order contract and configurable limits
/// - `orderbook`: side structures, matching, cancellation and queries

pub mod fixed;
pub mod order;
pub mod orderbook;
pub mod validation;

// Re-export key types
pub use fixed::{Amount, Fixed, Price};
pub use order::{Order, OrderId, OrderRef, Side};
pub use orderbook::{Book, Depth, DepthPoint, Fills, OrderedSide};
pub use validation::{OrderValidator, ValidationConfig, ValidationError};
