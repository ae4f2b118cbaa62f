mod base;
pub mod memory_store;
pub mod mongodb_store;

pub use base::{create_store, Store};
