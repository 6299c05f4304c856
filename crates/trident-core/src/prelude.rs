pub use crate::action::{ActionKind, NavAction};
pub use crate::clock::{Clock, SystemClock, TestClock, system_clock};
pub use crate::config::TrackerConfig;
pub use crate::error::{InstrumentationError, NavStateError, RouteError, TraceError};
pub use crate::node::{
    ActiveLeaf, NavigationNode, Params, SceneSnapshot, resolve_active_leaf, try_resolve_active_leaf,
};
pub use crate::route::{RouteIdentity, canonical_name, canonical_url};
