//! Storage layer for the workflow engine
//!
//! Keyed stores for definitions and instances. The engine only talks to
//! the [`Storage`] trait; [`InMemoryStorage`] is the bundled backend.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{DefinitionStore, InstanceStore, Storage, StorageError, StorageResult};
