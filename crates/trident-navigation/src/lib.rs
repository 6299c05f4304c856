//! # Scene lifecycle tracking
//!
//! `SceneTracker` sits in the store's update cycle. For every action it
//! resolves the active scene before and after, and when the visible scene
//! instance actually changed it:
//!
//! 1. calls the outgoing scene's `on_pause`,
//! 2. calls the incoming scene's `on_resume`, or queues it until that scene
//!    registers,
//! 3. records the new current scene and its route URL,
//! 4. reports page end/start to the instrumentation sink.
//!
//! Navigate and complete-transition actions additionally drive per-route
//! transition timing.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use trident_core::*;
//! use trident_navigation::*;
//!
//! let mut tracker = SceneTracker::default();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! tracker.register("k1", LifecycleCallbacks::new().on_resume({
//!     let seen = seen.clone();
//!     move |c: &SceneChange| seen.lock().unwrap().push(c.to_scene.clone())
//! }));
//!
//! let state = NavigationNode::branch(0, vec![NavigationNode::leaf("a.list", "k1")]);
//! let outcome = tracker.on_store_update(None, Some(&state), &NavAction::navigate());
//! assert!(outcome.is_some());
//! assert_eq!(*seen.lock().unwrap(), vec!["a.list".to_string()]);
//! ```

pub mod context;
pub mod detector;
pub mod instrumentation;
pub mod registry;
pub mod timing;
pub mod tracker;

pub use context::*;
pub use detector::*;
pub use instrumentation::*;
pub use registry::*;
pub use timing::*;
pub use tracker::*;
