//! Depth-of-book snapshot
//!
//! Aggregates remaining quantity per price level, in each side's ranking
//! order, up to a requested number of levels.

use crate::domain::fixed::{Amount, Fixed, Price};
use crate::domain::order::Order;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One aggregated price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthPoint {
    pub price: Price,
    /// Sum of `amount - filled` over the orders resting at `price`
    pub amount: Amount,
}

/// Per-side depth, each side in its ranking order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Depth {
    pub asks: Vec<DepthPoint>,
    pub bids: Vec<DepthPoint>,
}

/// Walks `orders` (already in ranking order) and emits at most `levels` points
///
/// A level is emitted when the price changes, and only if its quantity is
/// nonzero. The pending level left when the walk ends is emitted only while
/// fewer than `levels` points exist.
pub(crate) fn aggregate<'a, I>(orders: I, levels: usize) -> Vec<DepthPoint>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut points = Vec::new();
    let mut pending: Option<DepthPoint> = None;

    for order in orders {
        if points.len() == levels {
            break;
        }

        let same_level = pending.map_or(false, |point| point.price == order.price);
        if !same_level {
            if let Some(point) = pending.take() {
                if !point.amount.is_zero() {
                    points.push(point);
                }
            }
            pending = Some(DepthPoint {
                price: order.price,
                amount: Fixed::ZERO,
            });
        }

        if let Some(point) = pending.as_mut() {
            point.amount += order.remaining();
        }
    }

    if points.len() < levels {
        if let Some(point) = pending {
            if !point.amount.is_zero() {
                points.push(point);
            }
        }
    }

    points
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "asks ({}):", self.asks.len())?;
        for point in &self.asks {
            writeln!(f, "  {:>15} {:>15}", point.price, point.amount)?;
        }
        writeln!(f, "bids ({}):", self.bids.len())?;
        for point in &self.bids {
            writeln!(f, "  {:>15} {:>15}", point.price, point.amount)?;
        }
        Ok(())
    }
}
