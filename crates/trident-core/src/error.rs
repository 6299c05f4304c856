use thiserror::Error;

/// Why a navigation state tree could not be resolved to an active leaf.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavStateError {
    #[error("active index {index} out of range for branch with {len} routes (depth {depth})")]
    ActiveIndexOutOfRange {
        index: usize,
        len: usize,
        depth: usize,
    },

    #[error("branch at depth {depth} has no usable active index")]
    InvalidActiveIndex { depth: usize },

    #[error("branch at depth {depth} has no routes")]
    EmptyBranch { depth: usize },

    #[error("active leaf has no route name")]
    MissingRouteName,

    #[error("active leaf has no instance key")]
    MissingInstanceKey,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("module name is empty")]
    EmptyModule,

    #[error("scene name is empty")]
    EmptyScene,

    #[error("module name '{0}' contains the route separator")]
    SeparatorInModule(String),
}

/// Returned by an instrumentation sink. The tracker logs it and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InstrumentationError {
    #[error("report rejected: {0}")]
    Rejected(String),

    #[error("instrumentation backend unavailable")]
    Unavailable,
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to parse payload: {0}")]
    Parse(#[from] serde_json::Error),
}
