//! Click Directive
//!
//! `ui-click` runs a possibly asynchronous handler on click and refuses to
//! run it again while the previous run is in flight. This is what keeps a
//! slow "Save" button from submitting twice.
//!
//! # Lifecycle of a Click
//!
//! 1. Propagation is stopped immediately, before anything asynchronous
//!    happens, so the browser's default action never sees the click.
//! 2. If a previous run is pending, the click ends here.
//! 3. Otherwise the element is marked pending (`ui-click-pending`) and, if
//!    `ui-click-text` is set, its text is swapped for the pending text.
//! 4. A task waits one animation frame (only when the text changed), runs
//!    the handler and forwards a failure to the hosting component.
//! 5. A guard restores the text, clears the marker and releases the
//!    pending flag, in that order, whether the handler succeeded, failed or
//!    panicked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::future::{self, FutureExt};
use tracing::{debug, error, trace};

use super::{attributes, names, BindTarget, ClickHandler, Directive, DirectiveEnv, DirectiveValue};
use crate::binding::Binding;
use crate::dom::{ElementRef, Event, EventKind, WeakElement};
use crate::error::{DirectiveError, HandlerError, Result};

/// The `ui-click` directive.
pub struct ClickDirective {
    env: DirectiveEnv,
}

impl ClickDirective {
    pub fn new(env: DirectiveEnv) -> Self {
        Self { env }
    }
}

/// Returns an element to its idle state when a click resolution ends.
struct PendingGuard {
    element: ElementRef,
    marker: String,
    original_text: Option<String>,
    resolved: Arc<AtomicBool>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        // Text goes back first so a click arriving right after release
        // never records the pending text as the original.
        if let Some(text) = self.original_text.take() {
            self.element.set_text_content(&text);
        }
        self.element.remove_attribute(&self.marker);
        self.resolved.store(true, Ordering::SeqCst);
    }
}

impl Directive for ClickDirective {
    fn name(&self) -> &'static str {
        names::CLICK
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        let handler: ClickHandler = match target.value {
            DirectiveValue::AsyncHandler(handler) => handler,
            DirectiveValue::Handler(handler) => Arc::new(move |event: Event| {
                handler(&event);
                future::ready(Ok::<(), HandlerError>(())).boxed()
            }),
            _ => {
                return Err(DirectiveError::InvalidValue {
                    directive: names::CLICK,
                    expected: "a click handler",
                })
            }
        };

        let pending_text = target
            .attributes
            .text(attributes::CLICK_TEXT)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        debug!(tag = %target.tag, pending_text = pending_text.is_some(), "binding ui-click");

        let resolved = Arc::new(AtomicBool::new(true));
        let weak: WeakElement = Arc::downgrade(&target.element);
        let env = self.env.clone();

        target.element.set_listener(
            EventKind::Click,
            Arc::new(move |event: &Event| {
                event.stop_propagation();

                let Some(element) = weak.upgrade() else {
                    return;
                };

                if resolved
                    .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
                    .is_err()
                {
                    trace!("click suppressed, previous handler still pending");
                    return;
                }

                element.set_attribute(&env.config.pending_attribute, "");
                let original_text = pending_text.as_ref().map(|text| {
                    let original = element.text_content();
                    element.set_text_content(text);
                    original
                });
                let wait_for_frame = original_text.is_some();

                let guard = PendingGuard {
                    element,
                    marker: env.config.pending_attribute.clone(),
                    original_text,
                    resolved: resolved.clone(),
                };
                let frames = env.frames.clone();
                let handler = handler.clone();
                let event = event.clone();

                env.runtime.spawn(async move {
                    if wait_for_frame {
                        frames.next_frame().await;
                    }
                    if let Err(failure) = handler(event).await {
                        forward_error(&guard.element, failure);
                    }
                    drop(guard);
                });
            }),
        );

        Ok(Binding::new(names::CLICK))
    }
}

/// Hand a handler failure to the element's hosting component.
fn forward_error(element: &ElementRef, failure: HandlerError) {
    match element.host() {
        Some(host) => {
            debug!(error = %failure, "click handler failed");
            host.on_error(failure);
        }
        None => error!(error = %failure, "click handler failed and its component is gone"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::testing::{settle, Fixture};
    use crate::directive::Attributes;
    use crate::dom::Element;
    use crate::router::RouterFlavor;
    use std::sync::atomic::AtomicI32;
    use tokio::sync::Notify;

    fn gated_handler(calls: Arc<AtomicI32>, gate: Arc<Notify>) -> DirectiveValue {
        DirectiveValue::async_handler(move |_| {
            let calls = calls.clone();
            let gate = gate.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                gate.notified().await;
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn clicks_while_pending_are_swallowed() {
        let fixture = Fixture::new(RouterFlavor::Path);
        let element = fixture.element("button");
        let calls = Arc::new(AtomicI32::new(0));
        let gate = Arc::new(Notify::new());

        ClickDirective::new(fixture.env.clone())
            .bind(BindTarget::new(element.clone(), "button", gated_handler(calls.clone(), gate.clone())))
            .unwrap();

        for _ in 0..5 {
            let event = element.dispatch(EventKind::Click);
            assert!(event.is_propagation_stopped());
        }
        settle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(element.has_attribute("ui-click-pending"));

        gate.notify_one();
        settle().await;
        assert!(!element.has_attribute("ui-click-pending"));

        // Released: the next click runs the handler again.
        element.dispatch(EventKind::Click);
        gate.notify_one();
        settle().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_is_forwarded_and_pending_cleared() {
        let fixture = Fixture::new(RouterFlavor::Path);
        let element = fixture.element("button");

        ClickDirective::new(fixture.env.clone())
            .bind(BindTarget::new(
                element.clone(),
                "button",
                DirectiveValue::async_handler(|_| async { Err("payment declined".into()) }),
            ))
            .unwrap();

        element.dispatch(EventKind::Click);
        settle().await;

        assert_eq!(fixture.host.errors(), vec!["payment declined".to_string()]);
        assert!(!element.has_attribute("ui-click-pending"));
    }

    #[tokio::test]
    async fn pending_text_is_shown_then_restored() {
        let fixture = Fixture::new(RouterFlavor::Path);
        let element = fixture.element("button").with_text("Save");
        let calls = Arc::new(AtomicI32::new(0));
        let gate = Arc::new(Notify::new());

        ClickDirective::new(fixture.env.clone())
            .bind(
                BindTarget::new(element.clone(), "button", gated_handler(calls, gate.clone()))
                    .with_attributes(Attributes::new().with_text(attributes::CLICK_TEXT, "Saving…")),
            )
            .unwrap();

        element.dispatch(EventKind::Click);
        assert_eq!(element.text_content(), "Saving…");

        settle().await;
        gate.notify_one();
        settle().await;

        assert_eq!(element.text_content(), "Save");
    }

    #[tokio::test]
    async fn synchronous_handlers_are_accepted() {
        let fixture = Fixture::new(RouterFlavor::Path);
        let element = fixture.element("button");
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();

        ClickDirective::new(fixture.env.clone())
            .bind(BindTarget::new(
                element.clone(),
                "button",
                DirectiveValue::handler(move |_| {
                    calls_clone.fetch_add(1, Ordering::SeqCst);
                }),
            ))
            .unwrap();

        element.dispatch(EventKind::Click);
        settle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_non_handler_values() {
        let fixture = Fixture::new(RouterFlavor::Path);
        let element = fixture.element("button");

        let error = ClickDirective::new(fixture.env.clone())
            .bind(BindTarget::new(element.clone(), "button", DirectiveValue::text("save")))
            .unwrap_err();

        assert!(matches!(error, DirectiveError::InvalidValue { directive: "ui-click", .. }));
        assert!(!element.has_listener(EventKind::Click));
    }
}
