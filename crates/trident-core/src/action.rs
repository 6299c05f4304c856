use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::Params;

pub const NAVIGATE: &str = "Navigation/NAVIGATE";
pub const COMPLETE_TRANSITION: &str = "Navigation/COMPLETE_TRANSITION";
pub const RESET: &str = "Navigation/RESET";
pub const BACK: &str = "Navigation/BACK";
pub const SET_PARAMS: &str = "Navigation/SET_PARAMS";

/// The `type` discriminator of a store action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Navigate,
    CompleteTransition,
    Reset,
    Back,
    SetParams,
    /// Anything the navigation layer does not know about (app reducers' actions).
    Other(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Navigate => NAVIGATE,
            ActionKind::CompleteTransition => COMPLETE_TRANSITION,
            ActionKind::Reset => RESET,
            ActionKind::Back => BACK,
            ActionKind::SetParams => SET_PARAMS,
            ActionKind::Other(s) => s,
        }
    }
}

impl From<String> for ActionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            NAVIGATE => ActionKind::Navigate,
            COMPLETE_TRANSITION => ActionKind::CompleteTransition,
            RESET => ActionKind::Reset,
            BACK => ActionKind::Back,
            SET_PARAMS => ActionKind::SetParams,
            _ => ActionKind::Other(s),
        }
    }
}

impl From<&str> for ActionKind {
    fn from(s: &str) -> Self {
        ActionKind::from(s.to_string())
    }
}

impl From<ActionKind> for String {
    fn from(k: ActionKind) -> Self {
        k.as_str().to_string()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store action as seen by the tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    /// Sub-actions of a reset.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NavAction>,
}

impl NavAction {
    pub fn new(kind: impl Into<ActionKind>) -> Self {
        Self {
            kind: kind.into(),
            params: None,
            actions: Vec::new(),
        }
    }

    pub fn navigate() -> Self {
        Self::new(ActionKind::Navigate)
    }

    pub fn complete_transition() -> Self {
        Self::new(ActionKind::CompleteTransition)
    }

    pub fn reset(actions: Vec<NavAction>) -> Self {
        Self {
            kind: ActionKind::Reset,
            params: None,
            actions,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(name.into(), value.into());
        self
    }

    /// Parameters describing the scene this action navigates to.
    ///
    /// Taken from the action rather than the resulting state, since state
    /// params may already have been overwritten by a later `SET_PARAMS`.
    /// A reset contributes the params of its first sub-action.
    pub fn transition_params(&self) -> Params {
        let source = match self.kind {
            ActionKind::Reset => match self.actions.first() {
                Some(first) => first,
                None => {
                    log::warn!("{} without sub-actions; no transition params", self.kind);
                    return Params::new();
                }
            },
            _ => self,
        };
        source.params.clone().unwrap_or_default()
    }
}
