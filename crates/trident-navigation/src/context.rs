use trident_core::{RouteIdentity, SceneSnapshot};

use crate::detector::TransitionOutcome;

/// The last and current scene as of the most recent reportable transition.
///
/// Owned by one tracker; it starts uninitialized and is only written by
/// `commit`, once per transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationContext {
    last_scene: Option<SceneSnapshot>,
    current_scene: Option<SceneSnapshot>,
    last_scene_url: Option<String>,
    current_scene_url: Option<String>,
}

impl NavigationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// False until the first transition has been committed.
    pub fn is_initialized(&self) -> bool {
        self.last_scene.is_some() || self.current_scene.is_some()
    }

    pub fn last_scene(&self) -> Option<&SceneSnapshot> {
        self.last_scene.as_ref()
    }

    pub fn current_scene(&self) -> Option<&SceneSnapshot> {
        self.current_scene.as_ref()
    }

    pub fn last_scene_url(&self) -> Option<&str> {
        self.last_scene_url.as_deref()
    }

    pub fn current_scene_url(&self) -> Option<&str> {
        self.current_scene_url.as_deref()
    }

    pub fn current_route_name(&self) -> Option<&str> {
        self.current_scene.as_ref()?.route_name()
    }

    pub fn current_identity(&self) -> Option<RouteIdentity> {
        Some(RouteIdentity::from_parts(
            self.current_route_name()?,
            self.current_scene_url.as_deref()?,
        ))
    }

    pub(crate) fn commit(
        &mut self,
        prev: SceneSnapshot,
        next: SceneSnapshot,
        outcome: &TransitionOutcome,
    ) {
        self.last_scene = Some(prev);
        self.current_scene = Some(next);
        self.last_scene_url = Some(outcome.from_route_identity.canonical_url.clone());
        self.current_scene_url = Some(outcome.to_route_identity.canonical_url.clone());
    }
}
