/// Application Layer - Services
///
/// Wraps the domain `Book` for callers that need more than a single
/// thread: command channel, validation limits, metrics and logging.
/// The domain layer stays unaware of all of it.

pub mod services;

// Re-export key services
pub use services::{BookHandle, BookService, ServiceError};
