use serde::{Deserialize, Serialize};

/// Knobs for the scene tracker. Every field has a default, so hosts can
/// deserialize a partial table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Joins module and scene into a route name.
    pub route_separator: char,
    /// Route URL reported when nothing was on screen before.
    pub null_route: String,
    /// Param keys with this prefix belong to the navigation framework and
    /// never appear in route URLs. Empty disables prefix filtering.
    pub internal_param_prefix: String,
    /// Additional framework-internal param keys.
    pub internal_params: Vec<String>,
    /// Upper bound on in-flight timing records. `0` disables timing.
    pub max_in_flight_timings: usize,
    /// Upper bound on resumes queued for scenes that have not registered yet.
    /// The oldest is dropped past it. `0` disables queuing.
    pub max_pending_resumes: usize,
    /// Emit page start/end reports on every scene change.
    pub report_pages: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            route_separator: '.',
            null_route: "null".into(),
            internal_param_prefix: "_".into(),
            internal_params: Vec::new(),
            max_in_flight_timings: 64,
            max_pending_resumes: 256,
            report_pages: true,
        }
    }
}

impl TrackerConfig {
    pub fn is_internal_param(&self, key: &str) -> bool {
        (!self.internal_param_prefix.is_empty() && key.starts_with(&self.internal_param_prefix))
            || self.internal_params.iter().any(|k| k == key)
    }
}
