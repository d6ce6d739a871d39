//! Price-level side structure
//!
//! A BTreeMap from ranking key to a FIFO queue of the orders resting at that
//! price. Empty queues are removed eagerly, so every key in the map has at
//! least one resting order and `first()` is always the front of the first
//! queue.
//!
//! 复杂度：
//! - insert / first / remove_first: O(log L), L = number of price levels
//! - remove_if: O(log L + k), k = orders resting at that price

use super::traits::{Ascending, Descending, OrderedSide, Ranking};
use crate::domain::fixed::Price;
use crate::domain::order::Order;
use std::collections::{btree_map, BTreeMap, VecDeque};
use std::marker::PhantomData;

/// Resting orders of one side, grouped by price level
#[derive(Debug, Clone)]
pub struct PriceLevels<R: Ranking> {
    levels: BTreeMap<R::Key, VecDeque<Order>>,
    len: usize,
    _ranking: PhantomData<R>,
}

/// Bid side: lowest price ranks first
pub type BidSide = PriceLevels<Ascending>;

/// Ask side: highest price ranks first
pub type AskSide = PriceLevels<Descending>;

impl<R: Ranking> PriceLevels<R> {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            len: 0,
            _ranking: PhantomData,
        }
    }
}

impl<R: Ranking> Default for PriceLevels<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Ranking> OrderedSide for PriceLevels<R> {
    type Iter<'a> = std::iter::Flatten<btree_map::Values<'a, R::Key, VecDeque<Order>>>
    where
        Self: 'a;

    fn first(&self) -> Option<&Order> {
        self.levels.values().next().and_then(|queue| queue.front())
    }

    fn first_mut(&mut self) -> Option<&mut Order> {
        self.levels.values_mut().next().and_then(|queue| queue.front_mut())
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.levels.values().flatten()
    }

    fn insert(&mut self, order: Order) {
        self.levels
            .entry(R::key(order.price))
            .or_default()
            .push_back(order);
        self.len += 1;
    }

    fn remove_if<F>(&mut self, price: Price, predicate: F) -> Option<Order>
    where
        F: FnMut(&Order) -> bool,
    {
        let key = R::key(price);
        let queue = self.levels.get_mut(&key)?;
        let position = queue.iter().position(predicate)?;
        let order = queue.remove(position)?;

        if queue.is_empty() {
            self.levels.remove(&key);
        }
        self.len -= 1;

        Some(order)
    }

    fn remove_first(&mut self) -> Option<Order> {
        let mut level = self.levels.first_entry()?;
        let order = level.get_mut().pop_front();

        if level.get().is_empty() {
            level.remove();
        }
        if order.is_some() {
            self.len -= 1;
        }

        order
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixed::Fixed;

    fn bid(id: u64, price: i64) -> Order {
        Order::bid(id, Fixed::from_ratio(price, 1), Fixed::from_ratio(100, 1))
    }

    fn ask(id: u64, price: i64) -> Order {
        Order::ask(id, Fixed::from_ratio(price, 1), Fixed::from_ratio(100, 1))
    }

    fn ids<S: OrderedSide>(side: &S) -> Vec<u64> {
        side.iter().map(|order| order.id.0).collect()
    }

    #[test]
    fn test_bid_side_ranks_ascending() {
        let mut side = BidSide::new();
        side.insert(bid(1, 20));
        side.insert(bid(2, 10));
        side.insert(bid(3, 30));

        assert_eq!(side.first().map(|o| o.id.0), Some(2));
        assert_eq!(ids(&side), vec![2, 1, 3]);
        assert_eq!(side.len(), 3);
        assert_eq!(side.levels.len(), 3);
    }

    #[test]
    fn test_ask_side_ranks_descending() {
        let mut side = AskSide::new();
        side.insert(ask(1, 8));
        side.insert(ask(2, 9));
        side.insert(ask(3, 7));

        assert_eq!(side.first().map(|o| o.id.0), Some(2));
        assert_eq!(ids(&side), vec![2, 1, 3]);
    }

    #[test]
    fn test_equal_prices_keep_insertion_order() {
        let mut side = BidSide::new();
        side.insert(bid(1, 10));
        side.insert(bid(2, 5));
        side.insert(bid(3, 10));
        side.insert(bid(4, 10));

        assert_eq!(ids(&side), vec![2, 1, 3, 4]);
        assert_eq!(side.levels.len(), 2);
    }

    #[test]
    fn test_remove_if_matches_within_price() {
        let mut side = BidSide::new();
        side.insert(bid(1, 10));
        side.insert(bid(2, 10));
        side.insert(bid(3, 10));

        let removed = side.remove_if(Fixed::from_ratio(10, 1), |o| o.id.0 == 2);
        assert_eq!(removed.map(|o| o.id.0), Some(2));
        assert_eq!(ids(&side), vec![1, 3]);
        assert_eq!(side.len(), 2);

        assert!(side.remove_if(Fixed::from_ratio(10, 1), |o| o.id.0 == 2).is_none());
    }

    #[test]
    fn test_remove_if_with_wrong_price_misses() {
        let mut side = AskSide::new();
        side.insert(ask(1, 10));

        assert!(side.remove_if(Fixed::from_ratio(11, 1), |o| o.id.0 == 1).is_none());
        assert_eq!(side.len(), 1);
    }

    #[test]
    fn test_remove_if_drops_empty_level() {
        let mut side = AskSide::new();
        side.insert(ask(1, 10));
        side.insert(ask(2, 12));

        side.remove_if(Fixed::from_ratio(12, 1), |o| o.id.0 == 2);
        assert_eq!(side.levels.len(), 1);
        assert_eq!(side.first().map(|o| o.id.0), Some(1));
    }

    #[test]
    fn test_remove_first_walks_ranking() {
        let mut side = BidSide::new();
        side.insert(bid(1, 15));
        side.insert(bid(2, 10));
        side.insert(bid(3, 10));

        assert_eq!(side.remove_first().map(|o| o.id.0), Some(2));
        assert_eq!(side.remove_first().map(|o| o.id.0), Some(3));
        assert_eq!(side.remove_first().map(|o| o.id.0), Some(1));
        assert!(side.remove_first().is_none());
        assert!(side.is_empty());
        assert_eq!(side.levels.len(), 0);
    }

    #[test]
    fn test_first_mut_updates_in_place() {
        let mut side = BidSide::new();
        side.insert(bid(1, 10));

        if let Some(order) = side.first_mut() {
            order.filled = Fixed::from_ratio(40, 1);
        }
        assert_eq!(side.first().map(|o| o.remaining()), Some(Fixed::from_ratio(60, 1)));
    }
}
