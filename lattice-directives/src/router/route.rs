//! Route tree nodes.

use std::fmt;
use std::sync::Arc;

struct RouteNode {
    path: String,
    parent: Option<Route>,
}

/// A node in the router's route tree.
///
/// Cheap to clone; clones refer to the same node.
#[derive(Clone)]
pub struct Route(Arc<RouteNode>);

impl Route {
    /// Create a top-level route.
    pub fn root(path: impl Into<String>) -> Self {
        Self(Arc::new(RouteNode {
            path: path.into(),
            parent: None,
        }))
    }

    /// Create a route nested under this one.
    pub fn child(&self, path: impl Into<String>) -> Self {
        Self(Arc::new(RouteNode {
            path: path.into(),
            parent: Some(self.clone()),
        }))
    }

    pub fn path(&self) -> &str {
        &self.0.path
    }

    pub fn parent(&self) -> Option<&Route> {
        self.0.parent.as_ref()
    }

    /// This route followed by its parent chain up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Route> {
        std::iter::successors(Some(self), |route| route.parent())
    }

    /// Whether `ancestor` is this route or one of its parents, compared by
    /// path so that separately constructed trees still match.
    pub fn is_within(&self, ancestor: &Route) -> bool {
        self.ancestors().any(|route| route.path() == ancestor.path())
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Route) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path())
            .field("parent", &self.parent().map(Route::path))
            .finish()
    }
}
