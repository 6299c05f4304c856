//! # Navigation state, routes and actions
//!
//! `trident-core` holds the data the scene tracker reasons about. There are
//! three main pieces:
//!
//! - `NavigationNode` — the host's navigation state tree (branches of nested
//!   navigators, leaves of mounted scenes).
//! - `NavAction` — the store action that produced a new state.
//! - `RouteIdentity` — a comparable `(name, url)` pair for reporting.
//!
//! ## Resolving the visible scene
//!
//! ```rust
//! use trident_core::*;
//!
//! let state = NavigationNode::branch(
//!     1,
//!     vec![
//!         NavigationNode::leaf("home.index", "k0"),
//!         NavigationNode::branch(0, vec![NavigationNode::leaf("account.list", "k1")]),
//!     ],
//! );
//! let scene = resolve_active_leaf(Some(&state));
//! assert_eq!(scene.route_name(), Some("account.list"));
//! assert_eq!(scene.instance_key(), Some("k1"));
//! ```
//!
//! Malformed trees (an `index` past the end of `routes`, a leaf without a
//! route name) resolve to an empty snapshot; `try_resolve_active_leaf`
//! reports the reason instead.
//!
//! ## Route names and URLs
//!
//! ```rust
//! use trident_core::*;
//!
//! let cfg = TrackerConfig::default();
//! let name = canonical_name("account", "detail", cfg.route_separator).unwrap();
//! let params = Params::from([("id".to_string(), serde_json::json!(42))]);
//! assert_eq!(canonical_url(&name, &params, &cfg), "account.detail?id=42");
//! ```
//!
//! Host payloads deserialize directly with `serde_json` (see `from_json`).

pub mod action;
pub mod clock;
pub mod config;
pub mod error;
pub mod node;
pub mod prelude;
pub mod route;
pub mod tests;

pub use action::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use node::*;
pub use route::*;

/// Parses a host JSON payload (navigation state or action).
pub fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, TraceError> {
    Ok(serde_json::from_str(json)?)
}
