//! In-memory backend for the bakery order book.
//!
//! All four collections live behind a single mutex, so every store method
//! runs as one critical section and joined reads observe a consistent
//! snapshot. Nothing survives the process.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
