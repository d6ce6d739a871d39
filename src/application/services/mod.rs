/// Application Services
///
/// - `BookService`: single-owner thread serializing every call into a `Book`

pub mod book_service;

pub use book_service::{BookCommand, BookHandle, BookService, ServiceError, TradeResult};
