//! Active-Link Directive
//!
//! `ui-href-active` marks an element with `ui-active` while its target route
//! is, or contains, the active route. Navigation menus use it to highlight
//! the current section; styling is left to the stylesheet.
//!
//! An element is active when both hold:
//!
//! - the active route's parent chain contains a route with the target's path
//! - the active path starts with the target's resolved path, which tells apart
//!   the same route reached with different parameters

use std::sync::Arc;

use tracing::trace;

use super::{names, BindTarget, Directive, DirectiveEnv, DirectiveValue};
use crate::binding::Binding;
use crate::dom::WeakElement;
use crate::error::{DirectiveError, Result};
use crate::router::Router;

/// The `ui-href-active` directive.
pub struct ActiveLinkDirective {
    env: DirectiveEnv,
}

impl ActiveLinkDirective {
    pub fn new(env: DirectiveEnv) -> Self {
        Self { env }
    }
}

struct ActiveMarker {
    element: WeakElement,
    target: String,
    env: DirectiveEnv,
}

impl ActiveMarker {
    fn refresh(&self) {
        let Some(element) = self.element.upgrade() else {
            return;
        };

        let router = self.env.router.as_ref();
        let host = element.host();
        let path = router.absolute(&self.target, host.as_deref());
        let marker = &self.env.config.active_attribute;

        if is_active(router, &path) {
            trace!(%path, "link active");
            element.set_attribute(marker, "");
        } else {
            element.remove_attribute(marker);
        }
    }
}

/// Whether the link to `path` points at, or above, the active route.
fn is_active(router: &dyn Router, path: &str) -> bool {
    let Some(target) = router.route(path) else {
        return false;
    };
    let Some(active) = router.active_route() else {
        return false;
    };

    active.is_within(&target) && router.active_path().starts_with(path)
}

fn invalid_target() -> DirectiveError {
    DirectiveError::InvalidValue {
        directive: names::HREF_ACTIVE,
        expected: "a path, or `true` next to a [ui-href] attribute",
    }
}

impl Directive for ActiveLinkDirective {
    fn name(&self) -> &'static str {
        names::HREF_ACTIVE
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        let path = match target.value {
            DirectiveValue::Text(path) => path,
            DirectiveValue::Flag(true) => target
                .attributes
                .text(names::HREF)
                .map(str::to_string)
                .ok_or_else(invalid_target)?,
            _ => return Err(invalid_target()),
        };

        let marker = Arc::new(ActiveMarker {
            element: Arc::downgrade(&target.element),
            target: path,
            env: self.env.clone(),
        });

        let listener = marker.clone();
        let subscription = self
            .env
            .router
            .on_parameter_changed(Arc::new(move || listener.refresh()));

        marker.refresh();

        Ok(Binding::new(names::HREF_ACTIVE).with_subscription(subscription))
    }
}
