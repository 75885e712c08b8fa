//! Error types for the Workflow layer

use crate::{ActionId, StateId, WorkflowDefinitionId, WorkflowInstanceId};

/// Errors that can occur in Workflow operations
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    // ── Definition validation ────────────────────────────────────────
    #[error("Workflow Definition ID cannot be empty.")]
    EmptyDefinitionId,

    #[error("Workflow Definition with ID '{0}' already exists.")]
    DefinitionAlreadyExists(WorkflowDefinitionId),

    #[error("A workflow definition must contain exactly one initial state (found {found}).")]
    InitialStateCount { found: usize },

    #[error("Workflow Definition contains duplicate state ID '{0}'.")]
    DuplicateStateId(StateId),

    #[error("Workflow Definition contains duplicate action ID '{0}'.")]
    DuplicateActionId(ActionId),

    #[error("Action '{action}' references an unknown 'ToState' ID: '{state}'.")]
    UnknownTargetState { action: ActionId, state: StateId },

    #[error("Action '{action}' references an unknown 'FromState' ID: '{state}'.")]
    UnknownSourceState { action: ActionId, state: StateId },

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("Workflow Definition with ID '{0}' not found.")]
    DefinitionNotFound(WorkflowDefinitionId),

    #[error("Workflow Instance with ID '{0}' not found.")]
    InstanceNotFound(WorkflowInstanceId),

    #[error("Action '{action}' does not belong to workflow definition '{definition}'.")]
    ActionNotInDefinition {
        action: ActionId,
        definition: WorkflowDefinitionId,
    },

    // ── Transition rules ─────────────────────────────────────────────
    #[error("Action '{0}' is disabled.")]
    ActionDisabled(ActionId),

    #[error("Current state '{state}' is not a valid 'fromState' for action '{action}'.")]
    InvalidSourceState { state: StateId, action: ActionId },

    #[error("Cannot execute action '{action}' from a final state '{state}'.")]
    FinalState { action: ActionId, state: StateId },

    // ── Internal consistency ─────────────────────────────────────────
    #[error("Workflow Definition '{0}' has no initial state.")]
    NoInitialState(WorkflowDefinitionId),

    #[error("Workflow Definition '{definition}' for instance '{instance}' not found.")]
    DanglingDefinition {
        instance: WorkflowInstanceId,
        definition: WorkflowDefinitionId,
    },

    #[error("Workflow Instance with ID '{0}' already exists.")]
    InstanceAlreadyExists(WorkflowInstanceId),
}

/// Broad category of a [`WorkflowError`].
///
/// Boundary layers map these onto their own signals (HTTP status codes,
/// exit codes, ...). `InternalConsistency` marks corrupted data as opposed
/// to a caller mistake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or conflicting input, nothing was mutated
    Validation,
    /// Unknown definition, instance, or action
    NotFound,
    /// Transition refused by the definition's rules
    RuleViolation,
    /// Stored data contradicts itself
    InternalConsistency,
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyDefinitionId
            | Self::DefinitionAlreadyExists(_)
            | Self::InitialStateCount { .. }
            | Self::DuplicateStateId(_)
            | Self::DuplicateActionId(_)
            | Self::UnknownTargetState { .. }
            | Self::UnknownSourceState { .. } => ErrorKind::Validation,
            Self::DefinitionNotFound(_)
            | Self::InstanceNotFound(_)
            | Self::ActionNotInDefinition { .. } => ErrorKind::NotFound,
            Self::ActionDisabled(_) | Self::InvalidSourceState { .. } | Self::FinalState { .. } => {
                ErrorKind::RuleViolation
            }
            Self::NoInitialState(_)
            | Self::DanglingDefinition { .. }
            | Self::InstanceAlreadyExists(_) => ErrorKind::InternalConsistency,
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyDefinitionId => "EMPTY_DEFINITION_ID",
            Self::DefinitionAlreadyExists(_) => "DEFINITION_ALREADY_EXISTS",
            Self::InitialStateCount { .. } => "INITIAL_STATE_COUNT",
            Self::DuplicateStateId(_) => "DUPLICATE_STATE_ID",
            Self::DuplicateActionId(_) => "DUPLICATE_ACTION_ID",
            Self::UnknownTargetState { .. } => "UNKNOWN_TO_STATE",
            Self::UnknownSourceState { .. } => "UNKNOWN_FROM_STATE",
            Self::DefinitionNotFound(_) => "DEFINITION_NOT_FOUND",
            Self::InstanceNotFound(_) => "INSTANCE_NOT_FOUND",
            Self::ActionNotInDefinition { .. } => "ACTION_NOT_IN_DEFINITION",
            Self::ActionDisabled(_) => "ACTION_DISABLED",
            Self::InvalidSourceState { .. } => "INVALID_SOURCE_STATE",
            Self::FinalState { .. } => "FINAL_STATE",
            Self::NoInitialState(_) => "NO_INITIAL_STATE",
            Self::DanglingDefinition { .. } => "DANGLING_DEFINITION",
            Self::InstanceAlreadyExists(_) => "INSTANCE_ALREADY_EXISTS",
        }
    }
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
