//! Href Directive
//!
//! `ui-href` turns an element into a router-aware link. The target path
//! may depend on route parameters, so the link is rebuilt every time the
//! router reports a parameter change.
//!
//! Application routes are handled by the router: the anchor shows the
//! router's URL form and clicks become client-side navigation. Paths the
//! router does not know fall back to the browser.

use std::sync::Arc;

use tracing::{debug, trace};

use super::{attributes, names, BindTarget, Directive, DirectiveEnv, DirectiveValue};
use crate::binding::Binding;
use crate::dom::{Event, EventKind, WeakElement};
use crate::error::{DirectiveError, Result};

/// The `ui-href` directive.
pub struct HrefDirective {
    env: DirectiveEnv,
}

impl HrefDirective {
    pub fn new(env: DirectiveEnv) -> Self {
        Self { env }
    }
}

/// One bound link, rebuilt on every parameter change.
struct Link {
    element: WeakElement,
    target: String,
    anchor: bool,
    blank: bool,
    env: DirectiveEnv,
}

impl Link {
    fn refresh(&self) {
        let Some(element) = self.element.upgrade() else {
            return;
        };

        let router = &self.env.router;
        let host = element.host();
        let path = router.absolute(&self.target, host.as_deref());
        trace!(target = %self.target, %path, "resolving ui-href");

        if self.anchor {
            if self.blank {
                element.set_attribute("target", "_blank");
            }
            if router.route(&path).is_some() {
                element.set_attribute("href", &router.display_url(&path));
            }
        }

        let env = self.env.clone();
        let blank = self.blank;
        element.set_listener(
            EventKind::Click,
            Arc::new(move |event: &Event| {
                event.stop_propagation();
                event.prevent_default();
                follow(&env, &path, blank);
            }),
        );
    }
}

/// Navigate to `path` the way a click on the link should.
fn follow(env: &DirectiveEnv, path: &str, blank: bool) {
    let known = env.router.route(path).is_some();
    debug!(%path, known, blank, "following ui-href");

    match (known, blank) {
        (false, true) => env.window.open(path),
        (false, false) => env.window.assign_location(path),
        (true, true) => env.window.open(&env.router.display_url(path)),
        (true, false) => env.router.navigate(path),
    }
}

impl Directive for HrefDirective {
    fn name(&self) -> &'static str {
        names::HREF
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        let DirectiveValue::Text(path) = target.value else {
            return Err(DirectiveError::InvalidValue {
                directive: names::HREF,
                expected: "a path",
            });
        };

        let link = Arc::new(Link {
            element: Arc::downgrade(&target.element),
            target: path,
            anchor: target.tag == "a",
            blank: target.attributes.text(attributes::HREF_TARGET) == Some("blank"),
            env: self.env.clone(),
        });

        let listener = link.clone();
        let subscription = self
            .env
            .router
            .on_parameter_changed(Arc::new(move || listener.refresh()));

        link.refresh();

        Ok(Binding::new(names::HREF).with_subscription(subscription))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::testing::Fixture;
    use crate::directive::Attributes;
    use crate::dom::Element;
    use crate::router::{Route, RouterFlavor};

    fn docs_fixture(flavor: RouterFlavor) -> Fixture {
        let fixture = Fixture::new(flavor);
        fixture.router.add_route(&Route::root("/docs"));
        fixture
    }

    #[tokio::test]
    async fn known_route_on_anchor_shows_router_url() {
        let fixture = docs_fixture(RouterFlavor::Hash);
        let anchor = fixture.element("a");

        HrefDirective::new(fixture.env.clone())
            .bind(BindTarget::new(anchor.clone(), "a", DirectiveValue::text("/docs")))
            .unwrap();

        assert_eq!(anchor.attribute("href").as_deref(), Some("#/docs"));
        assert!(anchor.attribute("target").is_none());
    }

    #[tokio::test]
    async fn click_on_known_route_navigates_client_side() {
        let fixture = docs_fixture(RouterFlavor::Path);
        let anchor = fixture.element("a");

        HrefDirective::new(fixture.env.clone())
            .bind(BindTarget::new(anchor.clone(), "a", DirectiveValue::text("/docs")))
            .unwrap();

        let event = anchor.dispatch(EventKind::Click);

        assert!(event.is_default_prevented());
        assert!(event.is_propagation_stopped());
        assert_eq!(fixture.router.navigations(), vec!["/docs".to_string()]);
        assert!(fixture.window.location().is_none());
    }

    #[tokio::test]
    async fn blank_target_opens_router_url_in_new_window() {
        let fixture = docs_fixture(RouterFlavor::Hash);
        let anchor = fixture.element("a");

        HrefDirective::new(fixture.env.clone())
            .bind(
                BindTarget::new(anchor.clone(), "a", DirectiveValue::text("/docs"))
                    .with_attributes(Attributes::new().with_text(attributes::HREF_TARGET, "blank")),
            )
            .unwrap();

        assert_eq!(anchor.attribute("target").as_deref(), Some("_blank"));

        anchor.dispatch(EventKind::Click);
        assert_eq!(fixture.window.opened(), vec!["#/docs".to_string()]);
        assert!(fixture.router.navigations().is_empty());
    }

    #[tokio::test]
    async fn unknown_path_falls_back_to_the_browser() {
        let fixture = docs_fixture(RouterFlavor::Path);
        let anchor = fixture.element("a");

        HrefDirective::new(fixture.env.clone())
            .bind(BindTarget::new(anchor.clone(), "a", DirectiveValue::text("/legacy/report.pdf")))
            .unwrap();

        assert!(anchor.attribute("href").is_none());

        anchor.dispatch(EventKind::Click);
        assert_eq!(fixture.window.location().as_deref(), Some("/legacy/report.pdf"));
        assert!(fixture.router.navigations().is_empty());
    }

    #[tokio::test]
    async fn non_anchor_elements_get_no_href() {
        let fixture = docs_fixture(RouterFlavor::Path);
        let button = fixture.element("button");

        HrefDirective::new(fixture.env.clone())
            .bind(BindTarget::new(button.clone(), "button", DirectiveValue::text("/docs")))
            .unwrap();

        assert!(button.attribute("href").is_none());
        button.dispatch(EventKind::Click);
        assert_eq!(fixture.router.navigations(), vec!["/docs".to_string()]);
    }

    #[tokio::test]
    async fn relative_links_re_resolve_on_parameter_change() {
        let fixture = Fixture::new(RouterFlavor::Path);
        fixture.router.add_route(&Route::root("/users/1/posts"));
        fixture.router.add_route(&Route::root("/users/2/posts"));
        fixture.router.set_active(None, "/users/1");
        let anchor = fixture.element("a");

        HrefDirective::new(fixture.env.clone())
            .bind(BindTarget::new(anchor.clone(), "a", DirectiveValue::text("posts")))
            .unwrap();
        assert_eq!(anchor.attribute("href").as_deref(), Some("/users/1/posts"));

        fixture.router.set_active(None, "/users/2");
        assert_eq!(anchor.attribute("href").as_deref(), Some("/users/2/posts"));
    }

    #[tokio::test]
    async fn dropping_the_binding_unsubscribes() {
        let fixture = docs_fixture(RouterFlavor::Path);
        let anchor = fixture.element("a");

        let binding = HrefDirective::new(fixture.env.clone())
            .bind(BindTarget::new(anchor.clone(), "a", DirectiveValue::text("/docs")))
            .unwrap();
        assert_eq!(fixture.router.listener_count(), 1);

        drop(binding);
        assert_eq!(fixture.router.listener_count(), 0);
    }
}
