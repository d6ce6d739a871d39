/// Domain Layer - OrderBook Module
///
/// The matching engine proper: the book, its two side structures and the
/// depth queries over them.
///
/// ## Trait Abstraction
/// `OrderedSide` is the contract each side satisfies; `PriceLevels<R>` is
/// the BTreeMap-backed implementation, ranked by `Ascending` (bids) or
/// `Descending` (asks).

pub mod book;
pub mod depth;
pub mod price_levels;
pub mod traits;

pub use book::{Book, Fills};
pub use depth::{Depth, DepthPoint};
pub use price_levels::{AskSide, BidSide, PriceLevels};
pub use traits::{Ascending, Descending, OrderedSide, Ranking};
