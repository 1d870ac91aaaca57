//! Document implementations.

pub mod memory;

pub use memory::{Element, MemoryDocument};
