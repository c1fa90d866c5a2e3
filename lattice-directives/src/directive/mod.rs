//! Directives
//!
//! A directive is a named behavior attached to an element by a template
//! attribute. The template engine resolves an attribute to a
//! [`BindTarget`] (element, value, tag, attributes, option content), looks
//! up the directive by attribute name and calls [`Directive::bind`] once.
//! From then on the directive's listeners drive everything.
//!
//! # Built-in Directives
//!
//! | attribute | directive |
//! |---|---|
//! | `ui-click` | [`ClickDirective`]: async click with pending suppression |
//! | `ui-focus` | [`FocusDirective`]: focus forwarding |
//! | `ui-href` | [`HrefDirective`]: router-aware links |
//! | `ui-href-active` | [`ActiveLinkDirective`]: active-route marker |
//! | `id` | [`IdentityDirective`]: element ids and component slots |
//! | `ui-value` | [`OptionValueDirective`]: semantic option values |
//! | `$ui-value` | [`BoundValueDirective`]: two-way form binding |

mod active;
mod click;
mod focus;
mod href;
mod identity;
mod value;

#[cfg(test)]
pub(crate) mod testing;

pub use active::ActiveLinkDirective;
pub use click::ClickDirective;
pub use focus::FocusDirective;
pub use href::HrefDirective;
pub use identity::IdentityDirective;
pub use value::{BoundValueDirective, ControlKind, OptionEntry, OptionValueDirective};

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use serde_json::Value;
use tokio::runtime::Handle;

use crate::accessor::{Accessor, BoundValue};
use crate::binding::Binding;
use crate::config::DirectiveConfig;
use crate::dom::{ElementRef, Event, Window};
use crate::error::{HandlerError, Result};
use crate::frame::{FrameSource, IntervalFrames};
use crate::router::Router;

/// Registered directive names.
pub mod names {
    pub const CLICK: &str = "ui-click";
    pub const FOCUS: &str = "ui-focus";
    pub const HREF: &str = "ui-href";
    pub const HREF_ACTIVE: &str = "ui-href-active";
    pub const IDENTITY: &str = "id";
    pub const OPTION_VALUE: &str = "ui-value";
    pub const BOUND_VALUE: &str = "$ui-value";
}

/// Companion attributes read by the built-in directives.
pub mod attributes {
    /// Text shown on a clickable element while its handler runs.
    pub const CLICK_TEXT: &str = "ui-click-text";
    /// `blank` opens links in a new browsing context.
    pub const HREF_TARGET: &str = "ui-href-target";
    /// Change notification callback for two-way bound controls.
    pub const CHANGE: &str = "ui-change";
    /// Declared input type of a form control.
    pub const TYPE: &str = "type";
}

/// Synchronous event handler.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Asynchronous click handler.
pub type ClickHandler =
    Arc<dyn Fn(Event) -> BoxFuture<'static, std::result::Result<(), HandlerError>> + Send + Sync>;

/// Observer notified after a two-way bound control writes its accessor.
pub type ChangeCallback = Arc<dyn Fn(&BoundValue) + Send + Sync>;

/// The resolved value of a directive attribute.
#[derive(Clone)]
pub enum DirectiveValue {
    Handler(EventHandler),
    AsyncHandler(ClickHandler),
    Text(String),
    Flag(bool),
    Data(Value),
    Accessor(Accessor),
}

impl DirectiveValue {
    /// Wrap a synchronous handler.
    pub fn handler<F>(handler: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        Self::Handler(Arc::new(handler))
    }

    /// Wrap an async handler.
    pub fn async_handler<F, Fut>(handler: F) -> Self
    where
        F: Fn(Event) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), HandlerError>> + Send + 'static,
    {
        Self::AsyncHandler(Arc::new(move |event| handler(event).boxed()))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Short description used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handler(_) => "handler",
            Self::AsyncHandler(_) => "async handler",
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
            Self::Data(_) => "data",
            Self::Accessor(_) => "accessor",
        }
    }
}

impl std::fmt::Debug for DirectiveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Flag(flag) => f.debug_tuple("Flag").field(flag).finish(),
            Self::Data(value) => f.debug_tuple("Data").field(value).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// A value of a companion attribute.
#[derive(Clone)]
pub enum AttributeValue {
    Text(String),
    Callback(ChangeCallback),
}

/// The other attributes on the element being bound, in template order.
#[derive(Clone, Default)]
pub struct Attributes(IndexMap<String, AttributeValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.0.insert(name.to_string(), AttributeValue::Text(value.into()));
        self
    }

    pub fn with_callback<F>(mut self, name: &str, callback: F) -> Self
    where
        F: Fn(&BoundValue) + Send + Sync + 'static,
    {
        self.0
            .insert(name.to_string(), AttributeValue::Callback(Arc::new(callback)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// The attribute's text, if it is a text attribute.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(AttributeValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The attribute's callback, if it is a callback attribute.
    pub fn callback(&self, name: &str) -> Option<&ChangeCallback> {
        match self.0.get(name) {
            Some(AttributeValue::Callback(callback)) => Some(callback),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, value)| {
                let shown = match value {
                    AttributeValue::Text(text) => text.as_str(),
                    AttributeValue::Callback(_) => "<callback>",
                };
                (name, shown)
            }))
            .finish()
    }
}

/// Everything the template engine resolved for one directive attribute.
#[derive(Clone)]
pub struct BindTarget {
    pub element: ElementRef,
    pub value: DirectiveValue,
    pub tag: String,
    pub attributes: Attributes,
    /// Option entries of a `select`, empty for other elements.
    pub content: Vec<OptionEntry>,
}

impl BindTarget {
    pub fn new(element: ElementRef, tag: impl Into<String>, value: DirectiveValue) -> Self {
        Self {
            element,
            value,
            tag: tag.into(),
            attributes: Attributes::new(),
            content: Vec::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_content(mut self, content: Vec<OptionEntry>) -> Self {
        self.content = content;
        self
    }
}

impl std::fmt::Debug for BindTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindTarget")
            .field("tag", &self.tag)
            .field("value", &self.value)
            .field("attributes", &self.attributes)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

/// A named binder for template attributes.
pub trait Directive: Send + Sync {
    /// The attribute name this directive is registered under.
    fn name(&self) -> &'static str;

    /// Attach this directive's behavior to `target.element`.
    ///
    /// Usage errors are returned before the element is modified.
    fn bind(&self, target: BindTarget) -> Result<Binding>;
}

/// Collaborators shared by the built-in directives.
#[derive(Clone)]
pub struct DirectiveEnv {
    pub router: Arc<dyn Router>,
    pub window: Arc<dyn Window>,
    pub frames: Arc<dyn FrameSource>,
    /// Runtime async click handlers are spawned on.
    pub runtime: Handle,
    pub config: Arc<DirectiveConfig>,
    // Whether `frames` is the interval clock derived from `config`.
    paced_by_config: bool,
}

impl DirectiveEnv {
    /// Default configuration, frames paced by its frame interval.
    pub fn new(router: Arc<dyn Router>, window: Arc<dyn Window>, runtime: Handle) -> Self {
        let config = DirectiveConfig::default();
        Self {
            router,
            window,
            frames: Arc::new(IntervalFrames::new(config.frame_interval())),
            runtime,
            config: Arc::new(config),
            paced_by_config: true,
        }
    }

    /// Replace the configuration. The default frame clock follows the new
    /// interval; a source set with [`with_frames`](Self::with_frames) is kept.
    pub fn with_config(mut self, config: DirectiveConfig) -> Self {
        if self.paced_by_config {
            self.frames = Arc::new(IntervalFrames::new(config.frame_interval()));
        }
        self.config = Arc::new(config);
        self
    }

    pub fn with_frames(mut self, frames: Arc<dyn FrameSource>) -> Self {
        self.frames = frames;
        self.paced_by_config = false;
        self
    }
}

impl std::fmt::Debug for DirectiveEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveEnv")
            .field("flavor", &self.router.flavor())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Every built-in directive, bound to `env`.
pub fn builtin(env: &DirectiveEnv) -> Vec<Arc<dyn Directive>> {
    vec![
        Arc::new(ClickDirective::new(env.clone())),
        Arc::new(FocusDirective),
        Arc::new(HrefDirective::new(env.clone())),
        Arc::new(ActiveLinkDirective::new(env.clone())),
        Arc::new(IdentityDirective),
        Arc::new(OptionValueDirective::new(env.clone())),
        Arc::new(BoundValueDirective),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_distinguish_text_and_callbacks() {
        let set = Attributes::new()
            .with_text(attributes::TYPE, "number")
            .with_callback(attributes::CHANGE, |_| {});

        assert_eq!(set.text(attributes::TYPE), Some("number"));
        assert!(set.text(attributes::CHANGE).is_none());
        assert!(set.callback(attributes::CHANGE).is_some());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn attributes_debug_hides_callbacks() {
        let attributes = Attributes::new()
            .with_text("type", "text")
            .with_callback("ui-change", |_| {});

        assert_eq!(
            format!("{attributes:?}"),
            r#"{"type": "text", "ui-change": "<callback>"}"#
        );
    }

    #[test]
    fn directive_value_kinds() {
        assert_eq!(DirectiveValue::text("/docs").kind(), "text");
        assert_eq!(DirectiveValue::handler(|_| {}).kind(), "handler");
        assert_eq!(
            DirectiveValue::async_handler(|_| async { Ok(()) }).kind(),
            "async handler"
        );
    }

    #[tokio::test]
    async fn config_keeps_a_custom_frame_source() {
        use crate::router::RouterFlavor;
        use super::testing::Fixture;

        let fixture = Fixture::new(RouterFlavor::Path);
        let custom = fixture.env.frames.clone();
        let env = fixture.env.clone().with_config(DirectiveConfig {
            frame_interval_ms: 40,
            ..DirectiveConfig::default()
        });
        assert!(Arc::ptr_eq(&env.frames, &custom));
        assert_eq!(env.config.frame_interval_ms, 40);

        let paced = DirectiveEnv::new(fixture.router.clone(), fixture.window.clone(), Handle::current());
        let before = paced.frames.clone();
        let paced = paced.with_config(DirectiveConfig::default());
        assert!(!Arc::ptr_eq(&paced.frames, &before));
    }
}
