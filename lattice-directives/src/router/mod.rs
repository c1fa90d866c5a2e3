//! Router Interface
//!
//! The link directives depend on a client-side router for path resolution,
//! route lookup and navigation. The router itself (route-tree construction,
//! history handling) lives outside this crate; directives use it through the
//! [`Router`] trait.
//!
//! # Flavors
//!
//! Routers differ only in how an internal path is shown as a URL. A hash
//! router keeps the application path behind a fragment marker (`#/docs`),
//! a path router uses the path as is (`/docs`). See [`RouterFlavor`].

mod route;
pub mod headless;

pub use route::Route;

use std::sync::Arc;

use crate::binding::Subscription;
use crate::dom::HostComponent;

/// Callback fired when the router's route parameters change.
pub type ParameterListener = Arc<dyn Fn() + Send + Sync>;

/// How a router presents internal paths as URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterFlavor {
    /// Paths live in the URL fragment.
    Hash,
    /// Paths are the URL path.
    Path,
}

impl RouterFlavor {
    /// The URL a link to `path` should display.
    pub fn display_url(&self, path: &str) -> String {
        match self {
            Self::Hash => format!("#{path}"),
            Self::Path => path.to_string(),
        }
    }
}

/// The client-side router, as consumed by the link directives.
pub trait Router: Send + Sync {
    /// Resolve a possibly relative `path` in the context of `host`.
    fn absolute(&self, path: &str, host: Option<&dyn HostComponent>) -> String;

    /// Look up the route serving `path`.
    fn route(&self, path: &str) -> Option<Route>;

    /// The route matched by the current location.
    fn active_route(&self) -> Option<Route>;

    /// The full path of the current location.
    fn active_path(&self) -> String;

    /// Perform a client-side transition to `path`.
    fn navigate(&self, path: &str);

    fn flavor(&self) -> RouterFlavor;

    /// Register `listener` for parameter changes.
    ///
    /// The listener stays registered until the returned subscription drops.
    fn on_parameter_changed(&self, listener: ParameterListener) -> Subscription;

    /// The URL a link to `path` should display.
    fn display_url(&self, path: &str) -> String {
        self.flavor().display_url(path)
    }
}
