//! Headless Router
//!
//! A [`Router`] over a fixed route table with no history integration.
//! Navigation only moves the active route and fires parameter-change
//! listeners, which is all the link directives observe.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::trace;

use super::{ParameterListener, Route, Router, RouterFlavor};
use crate::binding::Subscription;
use crate::dom::HostComponent;

struct ActiveLocation {
    route: Option<Route>,
    path: String,
}

/// An in-memory router.
pub struct HeadlessRouter {
    flavor: RouterFlavor,
    routes: RwLock<HashMap<String, Route>>,
    active: RwLock<ActiveLocation>,
    navigations: Mutex<Vec<String>>,
    listeners: Arc<DashMap<u64, ParameterListener>>,
    next_listener_id: AtomicU64,
}

impl HeadlessRouter {
    pub fn new(flavor: RouterFlavor) -> Arc<Self> {
        Arc::new(Self {
            flavor,
            routes: RwLock::new(HashMap::new()),
            active: RwLock::new(ActiveLocation {
                route: None,
                path: "/".to_string(),
            }),
            navigations: Mutex::new(Vec::new()),
            listeners: Arc::new(DashMap::new()),
            next_listener_id: AtomicU64::new(0),
        })
    }

    /// Add `route` to the route table under its own path.
    pub fn add_route(&self, route: &Route) {
        self.routes
            .write()
            .insert(route.path().to_string(), route.clone());
    }

    /// Move the current location and notify parameter listeners.
    pub fn set_active(&self, route: Option<Route>, path: impl Into<String>) {
        {
            let mut active = self.active.write();
            active.route = route;
            active.path = path.into();
        }
        self.notify_parameter_changed();
    }

    /// Fire every parameter-change listener.
    pub fn notify_parameter_changed(&self) {
        // Collect first so listeners may subscribe or unsubscribe.
        let listeners: Vec<ParameterListener> = self
            .listeners
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        trace!(count = listeners.len(), "parameterchanged");
        for listener in listeners {
            listener();
        }
    }

    /// Paths passed to [`Router::navigate`], in order.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().clone()
    }

    /// Number of registered parameter-change listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Router for HeadlessRouter {
    fn absolute(&self, path: &str, host: Option<&dyn HostComponent>) -> String {
        if path.starts_with('/') || path.contains("://") {
            return path.to_string();
        }

        let base = host
            .and_then(|host| host.base_path())
            .unwrap_or_else(|| self.active_path());
        let relative = path.strip_prefix("./").unwrap_or(path);

        format!("{}/{}", base.trim_end_matches('/'), relative)
    }

    fn route(&self, path: &str) -> Option<Route> {
        self.routes.read().get(path).cloned()
    }

    fn active_route(&self) -> Option<Route> {
        self.active.read().route.clone()
    }

    fn active_path(&self) -> String {
        self.active.read().path.clone()
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().push(path.to_string());
        let route = self.route(path);
        self.set_active(route, path);
    }

    fn flavor(&self) -> RouterFlavor {
        self.flavor
    }

    fn on_parameter_changed(&self, listener: ParameterListener) -> Subscription {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, listener);

        let listeners = Arc::clone(&self.listeners);
        Subscription::new(move || {
            listeners.remove(&id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::headless::HeadlessHost;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn absolute_paths_pass_through() {
        let router = HeadlessRouter::new(RouterFlavor::Path);
        assert_eq!(router.absolute("/docs", None), "/docs");
        assert_eq!(router.absolute("https://example.com", None), "https://example.com");
    }

    #[test]
    fn relative_paths_resolve_against_host_then_location() {
        let router = HeadlessRouter::new(RouterFlavor::Path);
        router.set_active(None, "/shop/");

        assert_eq!(router.absolute("cart", None), "/shop/cart");

        let host = HeadlessHost::with_base_path("/account");
        assert_eq!(router.absolute("./orders", Some(&*host)), "/account/orders");
    }

    #[test]
    fn navigate_moves_the_active_route() {
        let router = HeadlessRouter::new(RouterFlavor::Hash);
        let docs = Route::root("/docs");
        router.add_route(&docs);

        router.navigate("/docs");

        assert!(router.active_route().is_some_and(|route| route.ptr_eq(&docs)));
        assert_eq!(router.active_path(), "/docs");
        assert_eq!(router.navigations(), vec!["/docs".to_string()]);
    }

    #[test]
    fn dropping_subscription_removes_listener() {
        let router = HeadlessRouter::new(RouterFlavor::Path);
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();

        let subscription = router.on_parameter_changed(Arc::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));
        router.notify_parameter_changed();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        drop(subscription);
        assert_eq!(router.listener_count(), 0);

        router.notify_parameter_changed();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
