use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::NavStateError;

/// Route parameters as the host attaches them. Sorted by key so every
/// serialization of the same mapping is identical.
pub type Params = BTreeMap<String, serde_json::Value>;

pub(crate) fn null_as_empty<'de, D>(d: D) -> Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Params>::deserialize(d).map(Option::unwrap_or_default)
}

/// One node of the host's navigation state tree.
///
/// Deserializes from the host shape: any node with `routes` is a branch,
/// everything else is a leaf carrying `routeName`, `key` and `params`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NavigationNode {
    Branch {
        /// `None` when the host sent something other than a non-negative
        /// integer. Such a branch does not resolve.
        index: Option<usize>,
        routes: Vec<NavigationNode>,
    },
    Leaf {
        #[serde(rename = "routeName", default)]
        route_name: Option<String>,
        #[serde(default)]
        key: Option<String>,
        #[serde(default, deserialize_with = "null_as_empty")]
        params: Params,
    },
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(default)]
    index: Option<serde_json::Value>,
    #[serde(default)]
    routes: Option<Vec<NavigationNode>>,
    #[serde(rename = "routeName", default)]
    route_name: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    params: Params,
}

impl<'de> Deserialize<'de> for NavigationNode {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawNode::deserialize(d)?;
        Ok(match raw.routes {
            Some(routes) => NavigationNode::Branch {
                index: raw
                    .index
                    .and_then(|v| v.as_u64())
                    .and_then(|n| usize::try_from(n).ok()),
                routes,
            },
            None => NavigationNode::Leaf {
                route_name: raw.route_name,
                key: raw.key,
                params: raw.params,
            },
        })
    }
}

impl NavigationNode {
    pub fn leaf(route_name: impl Into<String>, key: impl Into<String>) -> Self {
        NavigationNode::Leaf {
            route_name: Some(route_name.into()),
            key: Some(key.into()),
            params: Params::new(),
        }
    }

    pub fn branch(index: usize, routes: Vec<NavigationNode>) -> Self {
        NavigationNode::Branch {
            index: Some(index),
            routes,
        }
    }

    /// Adds a parameter to a leaf. No-op on branches.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        if let NavigationNode::Leaf { params, .. } = &mut self {
            params.insert(name.into(), value.into());
        }
        self
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NavigationNode::Leaf { .. })
    }
}

/// Borrowed view of the leaf a tree resolves to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveLeaf<'a> {
    pub route_name: &'a str,
    pub instance_key: &'a str,
    pub params: &'a Params,
}

impl ActiveLeaf<'_> {
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            route_name: Some(self.route_name.to_string()),
            instance_key: Some(self.instance_key.to_string()),
        }
    }
}

/// The active leaf at one point in time. Both fields are `None` when the
/// state was absent or could not be resolved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub route_name: Option<String>,
    pub instance_key: Option<String>,
}

impl SceneSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(route_name: impl Into<String>, instance_key: impl Into<String>) -> Self {
        Self {
            route_name: Some(route_name.into()),
            instance_key: Some(instance_key.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.route_name.is_none() && self.instance_key.is_none()
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    pub fn instance_key(&self) -> Option<&str> {
        self.instance_key.as_deref()
    }
}

/// Walks `index` links down to the active leaf. Iterative, so the depth of
/// nested navigators does not grow the stack.
pub fn try_resolve_active_leaf(node: &NavigationNode) -> Result<ActiveLeaf<'_>, NavStateError> {
    let mut cur = node;
    let mut depth = 0usize;
    loop {
        match cur {
            NavigationNode::Branch { index, routes } => {
                if routes.is_empty() {
                    return Err(NavStateError::EmptyBranch { depth });
                }
                let index = index.ok_or(NavStateError::InvalidActiveIndex { depth })?;
                cur = routes
                    .get(index)
                    .ok_or(NavStateError::ActiveIndexOutOfRange {
                        index,
                        len: routes.len(),
                        depth,
                    })?;
                depth += 1;
            }
            NavigationNode::Leaf {
                route_name,
                key,
                params,
            } => {
                let route_name = route_name
                    .as_deref()
                    .ok_or(NavStateError::MissingRouteName)?;
                let instance_key = key.as_deref().ok_or(NavStateError::MissingInstanceKey)?;
                return Ok(ActiveLeaf {
                    route_name,
                    instance_key,
                    params,
                });
            }
        }
    }
}

/// Lenient resolution used by the tracker: an absent or malformed tree
/// resolves to an empty snapshot.
pub fn resolve_active_leaf(node: Option<&NavigationNode>) -> SceneSnapshot {
    let Some(node) = node else {
        return SceneSnapshot::empty();
    };
    match try_resolve_active_leaf(node) {
        Ok(leaf) => leaf.snapshot(),
        Err(e) => {
            log::warn!("unresolvable navigation state: {e}");
            SceneSnapshot::empty()
        }
    }
}
