//! Order entity and its identifiers
//!
//! An `Order` is created by the caller, handed to `Book::trade`, and from
//! then on mutated only by the book: its own fills while it is incoming, and
//! later fills while it rests as a counterparty.
//!
//! ## Invariants
//! - `0 <= filled <= amount`
//! - `money` is the sum of `quantity * resting_price` over every match the
//!   order took part in; the resting side's price values the trade even when
//!   this order is the resting one

use super::fixed::{Amount, Fixed, Price};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-assigned order identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        OrderId(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:16x}", self.0)
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Sell
    Ask,
    /// Buy
    Bid,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Ask => Side::Bid,
            Side::Bid => Side::Ask,
        }
    }

    /// Crossing test for an incoming order of this side
    ///
    /// An incoming ask keeps matching while the resting bid is priced at or
    /// below its limit; an incoming bid while the resting ask is at or above.
    #[inline]
    pub fn crosses(self, limit: Price, resting: Price) -> bool {
        match self {
            Side::Ask => resting <= limit,
            Side::Bid => resting >= limit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Ask => "ask",
            Side::Bid => "bid",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Limit order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub amount: Amount,
    pub filled: Amount,
    /// Accumulated traded value
    pub money: Amount,
}

impl Order {
    /// Creates an unfilled order
    pub fn new(id: u64, side: Side, price: Price, amount: Amount) -> Self {
        Self {
            id: id.into(),
            side,
            price,
            amount,
            filled: Fixed::ZERO,
            money: Fixed::ZERO,
        }
    }

    pub fn ask(id: u64, price: Price, amount: Amount) -> Self {
        Self::new(id, Side::Ask, price, amount)
    }

    pub fn bid(id: u64, price: Price, amount: Amount) -> Self {
        Self::new(id, Side::Bid, price, amount)
    }

    /// Unfilled quantity
    #[inline]
    pub fn remaining(&self) -> Amount {
        self.amount - self.filled
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled >= self.amount
    }

    /// Reference usable with `Book::cancel` while this order rests
    pub fn reference(&self) -> OrderRef {
        OrderRef::from(self)
    }

    /// Records one match
    #[inline]
    pub(crate) fn fill(&mut self, quantity: Amount, money: Amount) {
        self.filled += quantity;
        self.money += money;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} pr {:>15} amount {:>15} (filled {:>15} for {:>15})",
            self.side, self.id, self.price, self.amount, self.filled, self.money
        )
    }
}

/// Cancellation key: side, exact resting price and identifier
///
/// Lookup is keyed by `price`; a stale price misses even when the id rests
/// elsewhere on the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderRef {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
}

impl OrderRef {
    pub fn new(id: u64, side: Side, price: Price) -> Self {
        Self {
            id: id.into(),
            side,
            price,
        }
    }
}

impl From<&Order> for OrderRef {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            side: order.side,
            price: order.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_crossing() {
        let ten = Fixed::from_ratio(10, 1);
        let twenty = Fixed::from_ratio(20, 1);

        // 卖单：对手买价不高于限价即可成交
        assert!(Side::Ask.crosses(twenty, ten));
        assert!(Side::Ask.crosses(ten, ten));
        assert!(!Side::Ask.crosses(ten, twenty));

        // 买单：对手卖价不低于限价即可成交
        assert!(Side::Bid.crosses(ten, twenty));
        assert!(Side::Bid.crosses(ten, ten));
        assert!(!Side::Bid.crosses(twenty, ten));
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Ask.opposite(), Side::Bid);
        assert_eq!(Side::Bid.opposite(), Side::Ask);
    }

    #[test]
    fn test_fill_and_remaining() {
        let mut order = Order::bid(7, Fixed::from_ratio(10, 1), Fixed::from_ratio(100, 1));
        assert_eq!(order.remaining(), Fixed::from_ratio(100, 1));
        assert!(!order.is_filled());

        order.fill(Fixed::from_ratio(40, 1), Fixed::from_ratio(400, 1));
        assert_eq!(order.remaining(), Fixed::from_ratio(60, 1));
        assert_eq!(order.money, Fixed::from_ratio(400, 1));

        order.fill(Fixed::from_ratio(60, 1), Fixed::from_ratio(600, 1));
        assert!(order.is_filled());
        assert_eq!(order.money, Fixed::from_ratio(1000, 1));
    }

    #[test]
    fn test_reference() {
        let order = Order::ask(3, Fixed::ONE, Fixed::ONE);
        assert_eq!(order.reference(), OrderRef::new(3, Side::Ask, Fixed::ONE));
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderId(255).to_string(), "              ff");
        let order = Order::ask(1, Fixed::ONE, Fixed::ONE);
        let text = order.to_string();
        assert!(text.starts_with("ask "));
        assert!(text.contains(" pr         1.00000 amount "));
    }
}
