//! Order Validator - Business Rule Validation
//!
//! Two layers of checks guard the book:
//!
//! - `ensure_tradeable`: the contract every incoming order must meet before
//!   `Book::trade` touches the book. The matching loop advances on
//!   `filled < amount`, so a non-positive amount or a pre-filled order is
//!   rejected instead of corrected.
//! - `OrderValidator`: configurable limits (price band, maximum amount)
//!   applied by the service layer on top of the contract.
//!
//! ## Usage
//! ```rust
//! use limit_book::domain::fixed::Fixed;
//! use limit_book::domain::order::Order;
//! use limit_book::domain::validation::{OrderValidator, ValidationConfig};
//!
//! let validator = OrderValidator::with_config(ValidationConfig {
//!     max_amount: Fixed::from_ratio(1000, 1),
//!     ..Default::default()
//! });
//! let order = Order::bid(1, Fixed::from_ratio(10, 1), Fixed::from_ratio(5, 1));
//! assert!(validator.validate(&order).is_ok());
//! ```

use super::fixed::{Amount, Fixed, Price};
use super::order::Order;

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Amount),

    #[error("incoming order already carries fills (filled {filled}, money {money})")]
    AlreadyFilled { filled: Amount, money: Amount },

    #[error("price {price} outside [{min}, {max}]")]
    PriceOutOfRange { price: Price, min: Price, max: Price },

    #[error("amount {amount} exceeds maximum {max}")]
    AmountOutOfRange { amount: Amount, max: Amount },
}

impl ValidationError {
    /// Short stable label, used for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::NonPositiveAmount(_) => "non_positive_amount",
            ValidationError::AlreadyFilled { .. } => "already_filled",
            ValidationError::PriceOutOfRange { .. } => "price_out_of_range",
            ValidationError::AmountOutOfRange { .. } => "amount_out_of_range",
        }
    }
}

/// Checks the incoming-order contract of `Book::trade`
pub fn ensure_tradeable(order: &Order) -> Result<(), ValidationError> {
    if !order.amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount(order.amount));
    }

    if !order.filled.is_zero() || !order.money.is_zero() {
        return Err(ValidationError::AlreadyFilled {
            filled: order.filled,
            money: order.money,
        });
    }

    Ok(())
}

/// Order validation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Minimum price (inclusive)
    pub min_price: Price,

    /// Maximum price (inclusive)
    pub max_price: Price,

    /// Maximum amount (inclusive)
    pub max_amount: Amount,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_price: Fixed::from_raw(1),
            max_price: Fixed::MAX,
            max_amount: Fixed::MAX,
        }
    }
}

/// Order validator
#[derive(Debug, Clone, Default)]
pub struct OrderValidator {
    config: ValidationConfig,
}

impl OrderValidator {
    /// Creates a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new validator with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validates an incoming order: trade contract first, then configured limits
    pub fn validate(&self, order: &Order) -> Result<(), ValidationError> {
        ensure_tradeable(order)?;
        self.validate_price(order.price)?;
        self.validate_amount(order.amount)?;
        Ok(())
    }

    fn validate_price(&self, price: Price) -> Result<(), ValidationError> {
        if price < self.config.min_price || price > self.config.max_price {
            return Err(ValidationError::PriceOutOfRange {
                price,
                min: self.config.min_price,
                max: self.config.max_price,
            });
        }

        Ok(())
    }

    fn validate_amount(&self, amount: Amount) -> Result<(), ValidationError> {
        if amount > self.config.max_amount {
            return Err(ValidationError::AmountOutOfRange {
                amount,
                max: self.config.max_amount,
            });
        }

        Ok(())
    }
}
