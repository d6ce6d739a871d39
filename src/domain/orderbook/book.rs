//! Limit order book for a single instrument
//!
//! `Book` owns one bid side, one ask side and the last traded price. All
//! mutation goes through `trade` and `cancel`; the sides are only ever
//! exposed read-only.
//!
//! ## Matching
//! An incoming order walks the opposing side from its `first()` entry:
//! - an ask consumes bids, starting at the lowest bid, while `bid <= ask limit`
//! - a bid consumes asks, starting at the highest ask, while `ask >= bid limit`
//!
//! Each match fills `min(incoming remaining, resting remaining)` on both
//! orders and values it at the resting order's price. A resting order whose
//! remaining quantity is covered is removed. Any unfilled remainder of the
//! incoming order rests on its own side afterwards.
//!
//! The book does no locking. Callers sharing a book across threads must
//! serialize access themselves, e.g. through `BookService`.
//!
//! ```rust
//! use limit_book::domain::fixed::Fixed;
//! use limit_book::domain::order::Order;
//! use limit_book::domain::orderbook::Book;
//!
//! let mut book = Book::new();
//! let one = Fixed::ONE;
//!
//! assert!(book.trade(Order::ask(1, one, one)).unwrap().is_none());
//!
//! let fills = book.trade(Order::bid(2, one, one)).unwrap().unwrap();
//! assert_eq!(fills.len(), 2);
//! assert_eq!(fills[0].money, one);
//! assert_eq!(book.last_price(), one);
//! ```

use super::depth::{aggregate, Depth};
use super::price_levels::{AskSide, BidSide};
use super::traits::OrderedSide;
use crate::domain::fixed::{Fixed, Price};
use crate::domain::order::{Order, OrderRef, Side};
use crate::domain::validation::{ensure_tradeable, ValidationError};
use smallvec::SmallVec;
use std::fmt;

/// Orders touched by one `trade` call: the incoming order first, then every
/// matched resting order in match order
pub type Fills = SmallVec<[Order; 8]>;

/// Single-instrument order book
#[derive(Debug, Clone, Default)]
pub struct Book {
    bids: BidSide,
    asks: AskSide,
    last: Price,
}

impl Book {
    /// Empty book, last price zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches `order` against the opposing side and rests any remainder
    ///
    /// Returns `Ok(None)` when nothing matched, otherwise snapshots of the
    /// incoming order followed by each touched resting order, taken after
    /// the match. Orders violating the incoming contract (non-positive
    /// amount, pre-existing fills) are rejected without touching the book.
    pub fn trade(&mut self, mut order: Order) -> Result<Option<Fills>, ValidationError> {
        ensure_tradeable(&order)?;

        // 预留首位给入场订单
        let mut fills = Fills::new();
        fills.push(order.clone());

        match order.side {
            Side::Ask => {
                sweep(&mut self.bids, &mut order, &mut self.last, &mut fills);
                if !order.is_filled() {
                    self.asks.insert(order.clone());
                }
            }
            Side::Bid => {
                sweep(&mut self.asks, &mut order, &mut self.last, &mut fills);
                if !order.is_filled() {
                    self.bids.insert(order.clone());
                }
            }
        }

        if fills.len() == 1 {
            return Ok(None);
        }

        fills[0] = order;
        Ok(Some(fills))
    }

    /// Removes the resting order identified by `reference`
    ///
    /// Only the entries at `reference.price` on `reference.side` are searched.
    /// Returns `None` if no order with that id rests there.
    pub fn cancel(&mut self, reference: &OrderRef) -> Option<Order> {
        let matches_id = |order: &Order| order.id == reference.id;

        match reference.side {
            Side::Ask => self.asks.remove_if(reference.price, matches_id),
            Side::Bid => self.bids.remove_if(reference.price, matches_id),
        }
    }

    /// `hi/2 + lo/2` over the first-ranked bid and ask prices
    ///
    /// A missing ask takes the bid price, a missing (zero) bid takes the ask
    /// price, and an empty book yields zero.
    pub fn middle_price(&self) -> Price {
        let mut hi = self.bids.first().map_or(Fixed::ZERO, |order| order.price);
        let lo = self.asks.first().map_or(hi, |order| order.price);

        if hi.is_zero() {
            hi = lo;
        }

        hi.half() + lo.half()
    }

    /// Price of the most recent match, zero before the first one
    pub fn last_price(&self) -> Price {
        self.last
    }

    /// Up to `levels` aggregated price levels per side
    pub fn depth(&self, levels: usize) -> Depth {
        Depth {
            asks: aggregate(self.asks.iter(), levels),
            bids: aggregate(self.bids.iter(), levels),
        }
    }

    pub fn bids(&self) -> &BidSide {
        &self.bids
    }

    pub fn asks(&self) -> &AskSide {
        &self.asks
    }

    /// Resting order count on `side`
    pub fn resting(&self, side: Side) -> usize {
        match side {
            Side::Ask => self.asks.len(),
            Side::Bid => self.bids.len(),
        }
    }
}

/// Consumes `opposing` from its first entry until `incoming` is filled or
/// the next resting order fails the crossing test
fn sweep<S: OrderedSide>(opposing: &mut S, incoming: &mut Order, last: &mut Price, fills: &mut Fills) {
    while !incoming.is_filled() {
        let Some(resting) = opposing.first_mut() else {
            break;
        };
        if !incoming.side.crosses(incoming.price, resting.price) {
            break;
        }

        let wanted = incoming.remaining();
        let available = resting.remaining();
        let quantity = wanted.min(available);
        let money = quantity * resting.price;

        incoming.fill(quantity, money);
        resting.fill(quantity, money);
        *last = resting.price;

        if wanted >= available {
            // 对手单已完全成交，移出订单簿
            if let Some(done) = opposing.remove_first() {
                fills.push(done);
            }
        } else {
            fills.push(resting.clone());
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "asks ({}):", self.asks.len())?;
        for order in self.asks.iter() {
            writeln!(f, "  {}", order)?;
        }
        writeln!(f, "bids ({}):", self.bids.len())?;
        for order in self.bids.iter() {
            writeln!(f, "  {}", order)?;
        }
        Ok(())
    }
}
