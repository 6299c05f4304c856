use trident_core::{NavAction, RouteIdentity, SceneSnapshot, TrackerConfig};

use crate::context::NavigationContext;
use crate::registry::SceneChange;

/// A reportable change of the active scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from_route_name: Option<String>,
    pub to_route_name: String,
    pub from_scene_key: Option<String>,
    pub to_scene_key: Option<String>,
    pub from_route_identity: RouteIdentity,
    pub to_route_identity: RouteIdentity,
}

impl TransitionOutcome {
    pub fn is_first(&self) -> bool {
        self.from_scene_key.is_none()
    }

    /// Whether the outgoing scene should get an onPause.
    pub fn pauses_outgoing(&self) -> bool {
        self.from_scene_key.is_some() && self.from_scene_key != self.to_scene_key
    }

    pub fn change(&self) -> SceneChange {
        SceneChange::new(self.from_route_name.as_deref(), self.to_route_name.clone())
    }
}

/// Decides whether going from `prev` to `next` is a reportable transition.
///
/// Only two shapes count: the very first resolution (nothing committed
/// yet and nothing active before), or a change of instance key. A new
/// state with the same instance key (params updated in place, say) is not
/// reported.
pub fn detect(
    context: &NavigationContext,
    prev: &SceneSnapshot,
    next: &SceneSnapshot,
    action: &NavAction,
    config: &TrackerConfig,
) -> Option<TransitionOutcome> {
    let to_route_name = next.route_name()?;

    let first = !context.is_initialized() && prev.instance_key().is_none();
    let changed = matches!(
        (prev.instance_key(), next.instance_key()),
        (Some(a), Some(b)) if a != b
    );
    if !(first || changed) {
        return None;
    }

    let params = action.transition_params();
    let from_route_identity = match context.current_scene_url() {
        Some(url) => RouteIdentity::from_parts(
            context
                .current_route_name()
                .unwrap_or(config.null_route.as_str()),
            url,
        ),
        None => RouteIdentity::null(config),
    };
    let to_route_identity = RouteIdentity::new(to_route_name, &params, config);

    Some(TransitionOutcome {
        from_route_name: prev.route_name.clone(),
        to_route_name: to_route_name.to_string(),
        from_scene_key: prev.instance_key.clone(),
        to_scene_key: next.instance_key.clone(),
        from_route_identity,
        to_route_identity,
    })
}
