//! Workflow Engine
//!
//! Validates state-machine definitions, starts instances on them, and
//! moves instances between states under the definition's rules.
//!
//! # Architecture
//!
//! The [`WorkflowEngine`] composes specialized components over one
//! shared [`Storage`]:
//!
//! - [`DefinitionRegistry`] - Validates, stores, and retrieves definitions
//! - [`InstanceManager`] - Starts instances and serves instance reads
//! - [`TransitionEngine`] - Checks and applies actions to instances
//!
//! All operations are synchronous. Concurrency safety comes from the
//! storage: definition ids are claimed with insert-if-absent and each
//! transition runs while its instance is exclusively held.
//!
//! # Example
//!
//! ```rust
//! use workflow_engine::WorkflowEngine;
//! use workflow_types::*;
//!
//! let engine = WorkflowEngine::in_memory();
//!
//! let def = WorkflowDefinition::new("order", "Order")
//!     .with_state(State::initial("new"))
//!     .with_state(State::terminal("done"))
//!     .with_action(Action::new("close", "done").from_state("new"));
//! engine.create_definition(def).unwrap();
//!
//! let instance = engine
//!     .start_instance(&WorkflowDefinitionId::new("order"))
//!     .unwrap();
//! let instance = engine
//!     .execute_action(&instance.id, &ActionId::new("close"))
//!     .unwrap();
//!
//! assert_eq!(instance.current_state_id, StateId::new("done"));
//! assert_eq!(instance.history.len(), 2);
//! ```

#![deny(unsafe_code)]

pub mod definition_registry;
pub mod engine;
pub mod instance_manager;
pub mod storage;
pub mod transition_engine;

// Re-export main types
pub use definition_registry::DefinitionRegistry;
pub use engine::{EngineStats, WorkflowEngine};
pub use instance_manager::InstanceManager;
pub use storage::{InMemoryStorage, Storage};
pub use transition_engine::TransitionEngine;
