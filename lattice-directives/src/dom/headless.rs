//! Headless DOM
//!
//! In-memory implementations of [`Element`], [`HostComponent`] and
//! [`Window`]. They carry no layout or rendering, only the state directives
//! read and write, and they record what happened to them so server-side
//! renderers and tests can inspect it.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use chrono::NaiveDate;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use super::{Element, ElementRef, Event, EventKind, HostComponent, Listener, Window};
use crate::accessor::FileHandle;
use crate::binding::Binding;
use crate::error::HandlerError;

#[derive(Default)]
struct ElementState {
    id: Option<String>,
    attributes: IndexMap<String, String>,
    text: String,
    checked: bool,
    value: String,
    input_type: Option<String>,
    files: Vec<FileHandle>,
    data_value: Option<Value>,
    listeners: HashMap<EventKind, Listener>,
    bindings: IndexMap<&'static str, Binding>,
}

/// An element that lives only in memory.
pub struct HeadlessElement {
    tag: String,
    host: Option<Weak<dyn HostComponent>>,
    state: Mutex<ElementState>,
}

impl HeadlessElement {
    /// Create a detached element with no hosting component.
    pub fn new(tag: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.into(),
            host: None,
            state: Mutex::new(ElementState::default()),
        })
    }

    /// Create an element rendered by `host`.
    pub fn hosted(tag: impl Into<String>, host: &Arc<dyn HostComponent>) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.into(),
            host: Some(Arc::downgrade(host)),
            state: Mutex::new(ElementState::default()),
        })
    }

    /// Builder-style attribute setter for template attributes.
    pub fn with_attribute(self: Arc<Self>, name: &str, value: &str) -> Arc<Self> {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style text setter.
    pub fn with_text(self: Arc<Self>, text: &str) -> Arc<Self> {
        self.set_text_content(text);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<String> {
        self.state.lock().id.clone()
    }

    pub fn input_type(&self) -> Option<String> {
        self.state.lock().input_type.clone()
    }

    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.state.lock().listeners.contains_key(&kind)
    }

    /// Number of bindings this element keeps alive.
    pub fn binding_count(&self) -> usize {
        self.state.lock().bindings.len()
    }

    /// Drop every retained binding, as unmounting does.
    pub fn release_bindings(&self) {
        let bindings = std::mem::take(&mut self.state.lock().bindings);
        drop(bindings);
    }

    /// Dispatch an event to the listener in `kind`'s slot.
    ///
    /// Returns the event so callers can inspect its propagation flags.
    pub fn dispatch(&self, kind: EventKind) -> Event {
        let event = Event::new(kind);

        // Release the lock before running the listener; it calls back in.
        let listener = self.state.lock().listeners.get(&kind).cloned();
        if let Some(listener) = listener {
            trace!(tag = %self.tag, event = kind.as_str(), "dispatching");
            listener(&event);
        }

        event
    }
}

impl Element for HeadlessElement {
    fn host(&self) -> Option<Arc<dyn HostComponent>> {
        self.host.as_ref().and_then(Weak::upgrade)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.state.lock().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .lock()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.state.lock().attributes.shift_remove(name);
    }

    fn text_content(&self) -> String {
        self.state.lock().text.clone()
    }

    fn set_text_content(&self, text: &str) {
        self.state.lock().text = text.to_string();
    }

    fn set_id(&self, id: &str) {
        self.state.lock().id = Some(id.to_string());
    }

    fn set_listener(&self, kind: EventKind, listener: Listener) {
        self.state.lock().listeners.insert(kind, listener);
    }

    fn checked(&self) -> bool {
        self.state.lock().checked
    }

    fn set_checked(&self, checked: bool) {
        self.state.lock().checked = checked;
    }

    fn value(&self) -> String {
        self.state.lock().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.state.lock().value = value.to_string();
    }

    fn value_as_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.state.lock().value, "%Y-%m-%d").ok()
    }

    fn set_value_as_date(&self, date: Option<NaiveDate>) {
        self.state.lock().value = date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
    }

    fn files(&self) -> Vec<FileHandle> {
        self.state.lock().files.clone()
    }

    fn set_files(&self, files: Vec<FileHandle>) {
        self.state.lock().files = files;
    }

    fn set_input_type(&self, input_type: &str) {
        self.state.lock().input_type = Some(input_type.to_string());
    }

    fn data_value(&self) -> Option<Value> {
        self.state.lock().data_value.clone()
    }

    fn set_data_value(&self, value: Value) {
        self.state.lock().data_value = Some(value);
    }

    fn retain(&self, binding: Binding) {
        // Drop the replaced binding outside the lock; its subscriptions may
        // call back into the router.
        let replaced = self
            .state
            .lock()
            .bindings
            .insert(binding.directive(), binding);
        drop(replaced);
    }
}

impl std::fmt::Debug for HeadlessElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HeadlessElement")
            .field("tag", &self.tag)
            .field("id", &state.id)
            .field("attributes", &state.attributes)
            .field("text", &state.text)
            .field("value", &state.value)
            .finish_non_exhaustive()
    }
}

/// A component that records errors and slot assignments.
#[derive(Default)]
pub struct HeadlessHost {
    base_path: Option<String>,
    errors: Mutex<Vec<String>>,
    slots: Mutex<HashMap<String, ElementRef>>,
}

impl HeadlessHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A host whose relative links resolve against `base_path`.
    pub fn with_base_path(base_path: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            base_path: Some(base_path.into()),
            ..Self::default()
        })
    }

    /// Messages of every error forwarded to this host.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn slot(&self, name: &str) -> Option<ElementRef> {
        self.slots.lock().get(name).cloned()
    }
}

impl HostComponent for HeadlessHost {
    fn on_error(&self, error: HandlerError) {
        self.errors.lock().push(error.to_string());
    }

    fn assign_slot(&self, name: &str, element: ElementRef) {
        self.slots.lock().insert(name.to_string(), element);
    }

    fn base_path(&self) -> Option<String> {
        self.base_path.clone()
    }
}

/// A window that records navigation instead of performing it.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    opened: Mutex<Vec<String>>,
    location: Mutex<Option<String>>,
}

impl HeadlessWindow {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// URLs opened in new browsing contexts, in order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }

    /// The last full-page navigation target.
    pub fn location(&self) -> Option<String> {
        self.location.lock().clone()
    }
}

impl Window for HeadlessWindow {
    fn open(&self, url: &str) {
        self.opened.lock().push(url.to_string());
    }

    fn assign_location(&self, url: &str) {
        *self.location.lock() = Some(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn listener_slot_is_replaced() {
        let element = HeadlessElement::new("button");
        let calls = Arc::new(AtomicI32::new(0));

        let first = calls.clone();
        element.set_listener(EventKind::Click, Arc::new(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        }));
        let second = calls.clone();
        element.set_listener(EventKind::Click, Arc::new(move |_| {
            second.fetch_add(10, Ordering::SeqCst);
        }));

        element.dispatch(EventKind::Click);
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn listener_may_touch_the_element() {
        let element = HeadlessElement::new("button");
        let weak = Arc::downgrade(&element);
        element.set_listener(EventKind::Click, Arc::new(move |_| {
            if let Some(element) = weak.upgrade() {
                element.set_attribute("clicked", "");
            }
        }));

        element.dispatch(EventKind::Click);
        assert!(element.has_attribute("clicked"));
    }

    #[test]
    fn value_as_date_round_trips_through_value() {
        let element = HeadlessElement::new("input");
        let date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

        element.set_value_as_date(Some(date));
        assert_eq!(element.value(), "2023-12-31");
        assert_eq!(element.value_as_date(), Some(date));

        element.set_value_as_date(None);
        assert_eq!(element.value(), "");
    }

    #[test]
    fn retaining_again_replaces_the_directive_binding() {
        use crate::binding::Subscription;

        let element = HeadlessElement::new("a");
        let released = Arc::new(AtomicI32::new(0));
        let counter = || {
            let released = released.clone();
            Subscription::new(move || {
                released.fetch_add(1, Ordering::SeqCst);
            })
        };

        element.retain(Binding::new("ui-href").with_subscription(counter()));
        element.retain(Binding::new("ui-href-active").with_subscription(counter()));
        assert_eq!(element.binding_count(), 2);

        element.retain(Binding::new("ui-href").with_subscription(counter()));
        assert_eq!(element.binding_count(), 2);
        assert_eq!(released.load(Ordering::SeqCst), 1);

        element.release_bindings();
        assert_eq!(released.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn host_is_weak() {
        let host: Arc<dyn HostComponent> = HeadlessHost::new();
        let element = HeadlessElement::hosted("div", &host);
        assert!(element.host().is_some());

        drop(host);
        assert!(element.host().is_none());
    }

    #[test]
    fn window_records_navigation() {
        let window = HeadlessWindow::new();
        window.open("https://example.com");
        window.assign_location("/docs");

        assert_eq!(window.opened(), vec!["https://example.com".to_string()]);
        assert_eq!(window.location().as_deref(), Some("/docs"));
    }
}
