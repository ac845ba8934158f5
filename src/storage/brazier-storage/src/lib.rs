//! # Brazier Storage
//!
//! Storage abstraction for the Brazier keystore.
//!
//! Backends hold one encrypted record per key; values are opaque JSON
//! strings, keys are UTF-8 strings. Writes are last-write-wins and removal
//! is idempotent.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod memory;

pub use backend::StorageBackend;
pub use error::StorageError;
pub use memory::MemoryBackend;
