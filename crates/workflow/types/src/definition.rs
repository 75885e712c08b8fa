//! Workflow definitions: reusable state-machine templates
//!
//! A WorkflowDefinition is a finite state machine schema where:
//! - States are nodes (exactly one initial, any number final)
//! - Actions are labeled edges with one or more source states and
//!   exactly one target state
//!
//! Definitions are immutable once accepted by the registry.

use crate::{WorkflowError, WorkflowResult};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use std::collections::HashSet;

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a workflow definition
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct WorkflowDefinitionId(pub String);

impl WorkflowDefinitionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the id is empty or contains only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for WorkflowDefinitionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WorkflowDefinitionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WorkflowDefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a state, unique within its definition
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct StateId(pub String);

impl StateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for StateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an action, unique within its definition
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct ActionId(pub String);

impl ActionId {
    /// Action id recorded on the synthetic first history entry
    pub const START: &'static str = "START";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn start() -> Self {
        Self(Self::START.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ActionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── State ────────────────────────────────────────────────────────────

/// A node of the state machine
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: StateId,
    /// Every new instance starts here
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_initial: bool,
    /// No action may execute from here
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_final: bool,
    /// Stored but not enforced by the transition rules
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl State {
    /// Create an enabled, non-initial, non-final state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: StateId::new(id),
            is_initial: false,
            is_final: false,
            enabled: true,
            description: String::new(),
        }
    }

    pub fn initial(id: impl Into<String>) -> Self {
        Self::new(id).as_initial()
    }

    pub fn terminal(id: impl Into<String>) -> Self {
        Self::new(id).as_final()
    }

    pub fn as_initial(mut self) -> Self {
        self.is_initial = true;
        self
    }

    pub fn as_final(mut self) -> Self {
        self.is_final = true;
        self
    }
}

// ── Action ───────────────────────────────────────────────────────────

/// A transition rule: from any of `from_states` to `to_state`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: ActionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from_states: Vec<StateId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to_state: StateId,
}

impl Action {
    /// Create an enabled action with no source states yet
    pub fn new(id: impl Into<String>, to_state: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(id),
            enabled: true,
            from_states: Vec::new(),
            to_state: StateId::new(to_state),
        }
    }

    pub fn from_state(mut self, state: impl Into<String>) -> Self {
        self.from_states.push(StateId::new(state));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether `state` is one of this action's legal sources
    pub fn accepts_from(&self, state: &StateId) -> bool {
        self.from_states.contains(state)
    }
}

// ── Workflow Definition ──────────────────────────────────────────────

/// A workflow definition: the state machine every instance follows
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    #[schema(example = "order")]
    pub id: WorkflowDefinitionId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub states: Vec<State>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: WorkflowDefinitionId::new(id),
            name: name.into(),
            states: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// The first state flagged as initial
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }

    /// Get a state by ID
    pub fn get_state(&self, id: &StateId) -> Option<&State> {
        self.states.iter().find(|s| &s.id == id)
    }

    /// Get an action by ID
    pub fn get_action(&self, id: &ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| &a.id == id)
    }

    pub fn has_state(&self, id: &StateId) -> bool {
        self.get_state(id).is_some()
    }

    /// Actions that list `state` as a source
    pub fn actions_from(&self, state: &StateId) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.accepts_from(state)).collect()
    }

    /// Structural validation of a proposed definition.
    ///
    /// Checks, first violation wins: non-blank id, exactly one initial
    /// state, unique state ids, unique action ids, then per action its
    /// target and source references. Whether the id is already taken is
    /// the registry's concern.
    ///
    /// Unreachable states and non-final states without outgoing actions
    /// are accepted.
    pub fn validate_structure(&self) -> WorkflowResult<()> {
        self.validate_id()?;
        self.validate_states_and_actions()
    }

    /// Rule: the id is not empty or whitespace-only
    pub fn validate_id(&self) -> WorkflowResult<()> {
        if self.id.is_blank() {
            return Err(WorkflowError::EmptyDefinitionId);
        }
        Ok(())
    }

    /// Every structural rule except the id check
    pub fn validate_states_and_actions(&self) -> WorkflowResult<()> {
        let found = self.states.iter().filter(|s| s.is_initial).count();
        if found != 1 {
            return Err(WorkflowError::InitialStateCount { found });
        }

        let mut state_ids = HashSet::new();
        for state in &self.states {
            if !state_ids.insert(&state.id) {
                return Err(WorkflowError::DuplicateStateId(state.id.clone()));
            }
        }

        let mut action_ids = HashSet::new();
        for action in &self.actions {
            if !action_ids.insert(&action.id) {
                return Err(WorkflowError::DuplicateActionId(action.id.clone()));
            }
        }

        for action in &self.actions {
            if !state_ids.contains(&action.to_state) {
                return Err(WorkflowError::UnknownTargetState {
                    action: action.id.clone(),
                    state: action.to_state.clone(),
                });
            }
            if let Some(unknown) = action.from_states.iter().find(|s| !state_ids.contains(s)) {
                return Err(WorkflowError::UnknownSourceState {
                    action: action.id.clone(),
                    state: unknown.clone(),
                });
            }
        }

        Ok(())
    }

    /// Total number of states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Total number of actions
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}
