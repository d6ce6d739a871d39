//! Book Service - Single-owner Order Book
//!
//! `Book` performs no locking, so concurrent callers go through this service:
//! the book lives on one dedicated thread which drains a command channel and
//! applies each command to completion before taking the next. Callers hold a
//! cloneable `BookHandle` and await the reply of each request.
//!
//! ## Architecture
//! - Receives commands via MPSC channel (Trade, Cancel, queries)
//! - Every command carries a oneshot reply sender
//! - Validates incoming orders with the configured `OrderValidator`
//! - Records Prometheus metrics and tracing events per command
//!
//! ## Lifecycle
//! Dropping every `BookHandle` closes the channel; the owner thread then
//! returns the `Book` through its `JoinHandle`.
//!
//! ## Usage
//! ```rust
//! use limit_book::application::services::BookService;
//! use limit_book::domain::{Book, Fixed, Order, OrderValidator, OrderedSide};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (handle, owner) = BookService::spawn(Book::new(), OrderValidator::new())?;
//!
//! handle.trade(Order::bid(1, Fixed::ONE, Fixed::ONE)).await?;
//! assert_eq!(handle.middle_price().await?, Fixed::ONE);
//!
//! drop(handle);
//! let book = owner.join().expect("book owner thread panicked");
//! assert_eq!(book.bids().first().map(|o| o.id.0), Some(1));
//! # Ok(())
//! # }
//! ```

use crate::domain::fixed::Price;
use crate::domain::order::{Order, OrderRef, Side};
use crate::domain::orderbook::{Book, Depth, Fills, OrderedSide};
use crate::domain::validation::{OrderValidator, ValidationError};
use crate::shared::metrics::METRICS;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Outcome of one trade command
pub type TradeResult = Result<Option<Fills>, ValidationError>;

/// Errors seen by `BookHandle` callers
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("order rejected: {0}")]
    Rejected(#[from] ValidationError),

    #[error("book service is not running")]
    Closed,
}

/// Commands that the book owner can receive
#[derive(Debug)]
pub enum BookCommand {
    Trade {
        order: Order,
        reply: oneshot::Sender<TradeResult>,
    },
    Cancel {
        reference: OrderRef,
        reply: oneshot::Sender<Option<Order>>,
    },
    MiddlePrice {
        reply: oneshot::Sender<Price>,
    },
    LastPrice {
        reply: oneshot::Sender<Price>,
    },
    Depth {
        levels: usize,
        reply: oneshot::Sender<Depth>,
    },
    Dump {
        reply: oneshot::Sender<String>,
    },
}

/// Owner of a single `Book`
pub struct BookService {
    book: Book,
    validator: OrderValidator,
    command_receiver: UnboundedReceiver<BookCommand>,
}

impl BookService {
    pub fn new(
        book: Book,
        validator: OrderValidator,
        command_receiver: UnboundedReceiver<BookCommand>,
    ) -> Self {
        BookService {
            book,
            validator,
            command_receiver,
        }
    }

    /// Moves `book` onto a dedicated owner thread
    pub fn spawn(
        book: Book,
        validator: OrderValidator,
    ) -> std::io::Result<(BookHandle, JoinHandle<Book>)> {
        let (command_sender, command_receiver) = mpsc::unbounded_channel();
        let service = BookService::new(book, validator, command_receiver);

        let owner = thread::Builder::new()
            .name("book-owner".to_string())
            .spawn(move || service.run())?;

        Ok((BookHandle::new(command_sender), owner))
    }

    /// Runs the command loop until every sender is dropped, then hands the
    /// book back
    ///
    /// Blocks the current thread; must not be called from inside an async
    /// runtime worker.
    pub fn run(mut self) -> Book {
        info!(
            bids = self.book.resting(Side::Bid),
            asks = self.book.resting(Side::Ask),
            "book service started"
        );

        while let Some(command) = self.command_receiver.blocking_recv() {
            self.handle(command);
        }

        info!(last_price = %self.book.last_price(), "book service stopped");
        self.book
    }

    /// Applies one command to the book and sends its reply
    pub fn handle(&mut self, command: BookCommand) {
        let delivered = match command {
            BookCommand::Trade { order, reply } => {
                let result = self.process_trade(order);
                reply.send(result).is_ok()
            }
            BookCommand::Cancel { reference, reply } => {
                let result = self.process_cancel(&reference);
                reply.send(result).is_ok()
            }
            BookCommand::MiddlePrice { reply } => reply.send(self.book.middle_price()).is_ok(),
            BookCommand::LastPrice { reply } => reply.send(self.book.last_price()).is_ok(),
            BookCommand::Depth { levels, reply } => reply.send(self.book.depth(levels)).is_ok(),
            BookCommand::Dump { reply } => reply.send(self.book.to_string()).is_ok(),
        };

        if !delivered {
            // 请求方已放弃等待，结果已生效但无人接收
            debug!("reply receiver dropped before response");
        }
    }

    fn process_trade(&mut self, order: Order) -> TradeResult {
        let id = order.id.0;
        let side = order.side;
        METRICS.orders_total.with_label_values(&[side.as_str()]).inc();

        if let Err(err) = self.validator.validate(&order) {
            warn!(id, %side, %err, "order rejected");
            METRICS.rejections_total.with_label_values(&[err.reason()]).inc();
            return Err(err);
        }

        let started = Instant::now();
        let result = self.book.trade(order);
        METRICS
            .matching_duration
            .observe(started.elapsed().as_secs_f64() * 1_000_000.0);

        if let Ok(Some(fills)) = &result {
            let counterparties = fills.len() - 1;
            let filled = fills[0].filled;
            METRICS
                .fills_total
                .with_label_values(&[side.opposite().as_str()])
                .inc_by(counterparties as f64);
            debug!(id, %side, %filled, counterparties, "order matched");
        }

        self.update_resting_gauges();
        result
    }

    fn process_cancel(&mut self, reference: &OrderRef) -> Option<Order> {
        let removed = self.book.cancel(reference);
        let status = if removed.is_some() { "found" } else { "not_found" };
        METRICS.cancellations_total.with_label_values(&[status]).inc();

        if removed.is_none() {
            let id = reference.id.0;
            debug!(id, side = %reference.side, price = %reference.price, "cancel missed");
        }

        self.update_resting_gauges();
        removed
    }

    fn update_resting_gauges(&self) {
        METRICS
            .resting_orders
            .with_label_values(&[Side::Bid.as_str()])
            .set(self.book.bids().len() as f64);
        METRICS
            .resting_orders
            .with_label_values(&[Side::Ask.as_str()])
            .set(self.book.asks().len() as f64);
    }
}

/// Cloneable client side of a `BookService`
#[derive(Debug, Clone)]
pub struct BookHandle {
    command_sender: UnboundedSender<BookCommand>,
}

impl BookHandle {
    pub fn new(command_sender: UnboundedSender<BookCommand>) -> Self {
        Self { command_sender }
    }

    /// See `Book::trade`; validation failures surface as `ServiceError::Rejected`
    pub async fn trade(&self, order: Order) -> Result<Option<Fills>, ServiceError> {
        let result = self
            .request(|reply| BookCommand::Trade { order, reply })
            .await?;
        Ok(result?)
    }

    pub async fn cancel(&self, reference: OrderRef) -> Result<Option<Order>, ServiceError> {
        self.request(|reply| BookCommand::Cancel { reference, reply })
            .await
    }

    pub async fn middle_price(&self) -> Result<Price, ServiceError> {
        self.request(|reply| BookCommand::MiddlePrice { reply }).await
    }

    pub async fn last_price(&self) -> Result<Price, ServiceError> {
        self.request(|reply| BookCommand::LastPrice { reply }).await
    }

    pub async fn depth(&self, levels: usize) -> Result<Depth, ServiceError> {
        self.request(|reply| BookCommand::Depth { levels, reply })
            .await
    }

    /// Text rendering of every resting order
    pub async fn dump(&self) -> Result<String, ServiceError> {
        self.request(|reply| BookCommand::Dump { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> BookCommand,
    ) -> Result<T, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.command_sender
            .send(command(reply))
            .map_err(|_| ServiceError::Closed)?;
        response.await.map_err(|_| ServiceError::Closed)
    }
}
