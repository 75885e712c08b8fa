//! Workflow Domain Types
//!
//! Workflows here are single-token finite state machines.
//!
//! # Key Concepts
//!
//! - **WorkflowDefinition**: A template of states and actions. Exactly
//!   one state is initial; actions lead from one or more source states
//!   to a single target state.
//! - **WorkflowInstance**: One running execution of a definition, with a
//!   current state and a full transition history.
//! - **HistoryEntry**: One traversed action. The first entry of every
//!   instance is a synthetic `START` with no source state.
//!
//! Structural validation of definitions lives here
//! ([`WorkflowDefinition::validate_structure`]). Registration, instance
//! storage, and transition rules live in `workflow-engine`.

#![deny(unsafe_code)]

mod definition;
mod errors;
mod instance;

pub use definition::*;
pub use errors::*;
pub use instance::*;
