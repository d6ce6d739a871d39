//! Side Structure Traits - Domain Layer Abstraction
//!
//! `OrderedSide` is the contract one side of the book must satisfy: an
//! ordered multiset of resting orders keyed by price, with FIFO order among
//! equal prices (time priority). The `Book` only talks to its sides through
//! this trait, so any balanced ordered container can back it.
//!
//! ## Ranking
//! Each side fixes its key order with a `Ranking`:
//! - bid side: `Ascending`, so `first()` is the lowest-priced bid
//! - ask side: `Descending`, so `first()` is the highest-priced ask
//!
//! The matching loop walks the opposing side from `first()` and stops at the
//! first entry failing the crossing test, so these orderings decide which
//! resting orders an incoming order reaches.
//!
//! ## Implementations
//! - `PriceLevels<R>`: BTreeMap of per-price FIFO queues

use crate::domain::fixed::Price;
use crate::domain::order::Order;
use std::cmp::Reverse;
use std::fmt::Debug;

/// Key order of one side
pub trait Ranking {
    /// Sort key derived from a price; equal prices must map to equal keys
    type Key: Ord + Copy + Debug;

    fn key(price: Price) -> Self::Key;
}

/// Lowest price first
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascending;

impl Ranking for Ascending {
    type Key = Price;

    #[inline]
    fn key(price: Price) -> Price {
        price
    }
}

/// Highest price first
#[derive(Debug, Clone, Copy, Default)]
pub struct Descending;

impl Ranking for Descending {
    type Key = Reverse<Price>;

    #[inline]
    fn key(price: Price) -> Reverse<Price> {
        Reverse(price)
    }
}

/// Ordered multiset of resting orders for one side of the book
pub trait OrderedSide {
    /// Forward iterator in ranking order, FIFO within a price
    type Iter<'a>: Iterator<Item = &'a Order>
    where
        Self: 'a;

    /// Best-ranked resting order
    fn first(&self) -> Option<&Order>;

    /// Mutable access to the best-ranked resting order, used to apply fills in place
    fn first_mut(&mut self) -> Option<&mut Order>;

    fn iter(&self) -> Self::Iter<'_>;

    /// Adds an order behind every resting order of equal price
    fn insert(&mut self, order: Order);

    /// Scans the entries resting at exactly `price` and removes the first one
    /// matching `predicate`
    ///
    /// Entries at any other price are never examined.
    fn remove_if<F>(&mut self, price: Price, predicate: F) -> Option<Order>
    where
        F: FnMut(&Order) -> bool;

    /// Removes the entry returned by `first()`
    fn remove_first(&mut self) -> Option<Order>;

    /// Number of resting orders
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
