//! Synthetic order flow
//!
//! Generates alternating bid/ask limit orders whose prices random-walk
//! around a reference price. The driver feeds the book's middle price back
//! after every trade, so the flow keeps crossing the book instead of
//! drifting away from it.
//!
//! Step `i`:
//! - side: bid for even `i`, ask for odd `i`; id `i + 1`
//! - `diff` uniform in `[0, 1000)`; every other pair of steps the reference
//!   price is scaled down by `diff / 100000`, otherwise up by
//!   `(diff + 100) / 100000`
//! - amount: whole units, uniform in `[1, 1000)`

use crate::domain::fixed::{Fixed, Price};
use crate::domain::order::{Order, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PRICE_STEP_DENOMINATOR: i64 = 100_000;
const UPWARD_BIAS: i64 = 100;

/// Random order generator
#[derive(Debug, Clone)]
pub struct OrderFlow {
    rng: StdRng,
    price: Price,
    step: u64,
}

impl OrderFlow {
    /// Flow seeded from OS entropy
    pub fn new(start_price: Price) -> Self {
        Self::with_rng(start_price, StdRng::from_entropy())
    }

    /// Reproducible flow
    pub fn seeded(start_price: Price, seed: u64) -> Self {
        Self::with_rng(start_price, StdRng::seed_from_u64(seed))
    }

    fn with_rng(start_price: Price, rng: StdRng) -> Self {
        Self {
            rng,
            price: start_price,
            step: 0,
        }
    }

    /// Current reference price
    pub fn price(&self) -> Price {
        self.price
    }

    /// Number of orders generated so far
    pub fn generated(&self) -> u64 {
        self.step
    }

    /// Resets the reference price, typically to the book's middle price
    ///
    /// A zero price (empty book) keeps the current reference.
    pub fn reprice(&mut self, price: Price) {
        if price.is_positive() {
            self.price = price;
        }
    }

    pub fn next_order(&mut self) -> Order {
        let i = self.step;
        self.step += 1;

        let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };

        let diff = self.rng.gen_range(0..1000);
        let factor = if (i >> 1) % 2 == 0 {
            Fixed::ONE - Fixed::from_ratio(diff, PRICE_STEP_DENOMINATOR)
        } else {
            Fixed::ONE + Fixed::from_ratio(diff + UPWARD_BIAS, PRICE_STEP_DENOMINATOR)
        };
        self.price = self.price * factor;

        let amount = Fixed::from_ratio(self.rng.gen_range(1..1000), 1);

        Order::new(i + 1, side, self.price, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_alternate_and_ids_increase() {
        let mut flow = OrderFlow::seeded(Fixed::from_ratio(10, 1), 7);

        let orders: Vec<Order> = (0..6).map(|_| flow.next_order()).collect();
        let sides: Vec<Side> = orders.iter().map(|o| o.side).collect();
        assert_eq!(
            sides,
            vec![Side::Bid, Side::Ask, Side::Bid, Side::Ask, Side::Bid, Side::Ask]
        );

        let ids: Vec<u64> = orders.iter().map(|o| o.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(flow.generated(), 6);
    }

    #[test]
    fn test_seeded_flow_is_reproducible() {
        let mut a = OrderFlow::seeded(Fixed::from_ratio(10, 1), 42);
        let mut b = OrderFlow::seeded(Fixed::from_ratio(10, 1), 42);

        for _ in 0..100 {
            assert_eq!(a.next_order(), b.next_order());
        }
    }

    #[test]
    fn test_amounts_are_positive_whole_units() {
        let mut flow = OrderFlow::seeded(Fixed::from_ratio(10, 1), 1);

        for _ in 0..1000 {
            let order = flow.next_order();
            assert!(order.amount >= Fixed::ONE);
            assert!(order.amount < Fixed::from_ratio(1000, 1));
            assert_eq!(order.amount.raw() % Fixed::ONE.raw(), 0);
        }
    }

    #[test]
    fn test_price_walk_direction() {
        let start = Fixed::from_ratio(10, 1);
        let mut flow = OrderFlow::seeded(start, 3);

        // 前两步向下或持平，后两步严格向上
        let first = flow.next_order().price;
        assert!(first <= start);
        let second = flow.next_order().price;
        assert!(second <= first);
        let third = flow.next_order().price;
        assert!(third > second);
        let fourth = flow.next_order().price;
        assert!(fourth > third);
    }

    #[test]
    fn test_reprice_ignores_zero() {
        let mut flow = OrderFlow::seeded(Fixed::from_ratio(10, 1), 5);
        flow.reprice(Fixed::ZERO);
        assert_eq!(flow.price(), Fixed::from_ratio(10, 1));

        flow.reprice(Fixed::from_ratio(12, 1));
        assert_eq!(flow.price(), Fixed::from_ratio(12, 1));
    }
}
