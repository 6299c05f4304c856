use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::error::RouteError;
use crate::node::Params;

/// Characters escaped in route URL components (same unreserved set as
/// `encodeURIComponent`).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Route name for `scene` inside `module`, e.g. `"account.detail"`.
///
/// Module names may not contain the separator; that keeps the mapping
/// injective (the first separator always splits module from scene).
pub fn canonical_name(module: &str, scene: &str, separator: char) -> Result<String, RouteError> {
    if module.is_empty() {
        return Err(RouteError::EmptyModule);
    }
    if scene.is_empty() {
        return Err(RouteError::EmptyScene);
    }
    if module.contains(separator) {
        return Err(RouteError::SeparatorInModule(module.to_string()));
    }
    Ok(format!("{module}{separator}{scene}"))
}

/// Query-string form of one param value: compact JSON, except that strings
/// are written bare unless they would read back as another JSON value.
/// `"42"` becomes `"42"` with its quotes while `42` stays `42`, so distinct
/// values never share an encoding.
fn param_value(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) if serde_json::from_str::<serde_json::Value>(s).is_err() => {
            s.clone()
        }
        other => other.to_string(),
    }
}

/// `route_name` followed by the non-internal params as a sorted query
/// string. Same name and equal params always give the same string.
pub fn canonical_url(route_name: &str, params: &Params, config: &TrackerConfig) -> String {
    let query: Vec<String> = params
        .iter()
        .filter(|(k, _)| !config.is_internal_param(k))
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, COMPONENT),
                utf8_percent_encode(&param_value(v), COMPONENT)
            )
        })
        .collect();
    if query.is_empty() {
        route_name.to_string()
    } else {
        format!("{route_name}?{}", query.join("&"))
    }
}

/// Comparable identity of a route as reported to instrumentation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteIdentity {
    pub canonical_name: String,
    pub canonical_url: String,
}

impl RouteIdentity {
    pub fn new(route_name: &str, params: &Params, config: &TrackerConfig) -> Self {
        Self {
            canonical_name: route_name.to_string(),
            canonical_url: canonical_url(route_name, params, config),
        }
    }

    pub fn from_parts(canonical_name: impl Into<String>, canonical_url: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            canonical_url: canonical_url.into(),
        }
    }

    /// Identity used when there was no previous scene.
    pub fn null(config: &TrackerConfig) -> Self {
        Self::from_parts(config.null_route.clone(), config.null_route.clone())
    }
}

impl fmt::Display for RouteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_url)
    }
}
