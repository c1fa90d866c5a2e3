//! DOM Interface
//!
//! Directives never talk to a concrete DOM. They see elements through the
//! [`Element`] trait, the component that rendered an element through
//! [`HostComponent`], and the browser window through [`Window`]. A renderer
//! backs these with real nodes; [`headless`] backs them with memory.
//!
//! # Ownership
//!
//! - An element refers to its hosting component weakly. The component owns
//!   the element tree, never the other way around.
//! - Listeners and router callbacks installed by directives hold weak
//!   element references, so an element is never kept alive by its own
//!   behavior.
//! - Bindings are retained by the element they were created for, tying
//!   router subscriptions to the element's lifetime.

mod event;
pub mod headless;

pub use event::{Event, EventKind, Listener};

use std::sync::{Arc, Weak};

use chrono::NaiveDate;
use serde_json::Value;

use crate::accessor::FileHandle;
use crate::binding::Binding;
use crate::error::HandlerError;

/// Shared handle to an element.
pub type ElementRef = Arc<dyn Element>;

/// Non-owning handle to an element.
pub type WeakElement = Weak<dyn Element>;

/// The component instance that rendered an element.
pub trait HostComponent: Send + Sync {
    /// Error sink for failures in asynchronous handlers.
    fn on_error(&self, error: HandlerError);

    /// Store `element` in the component field called `name`.
    fn assign_slot(&self, name: &str, element: ElementRef);

    /// Path relative links of this component resolve against.
    fn base_path(&self) -> Option<String> {
        None
    }
}

/// A DOM element as seen by directives.
///
/// All methods take `&self`; implementations use interior mutability.
pub trait Element: Send + Sync {
    /// The component that rendered this element, if it is still alive.
    fn host(&self) -> Option<Arc<dyn HostComponent>>;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn text_content(&self) -> String;
    fn set_text_content(&self, text: &str);

    fn set_id(&self, id: &str);

    /// Install `listener` in the slot for `kind`, replacing any previous one.
    fn set_listener(&self, kind: EventKind, listener: Listener);

    fn checked(&self) -> bool;
    fn set_checked(&self, checked: bool);

    fn value(&self) -> String;
    fn set_value(&self, value: &str);

    fn value_as_date(&self) -> Option<NaiveDate>;
    fn set_value_as_date(&self, date: Option<NaiveDate>);

    fn files(&self) -> Vec<FileHandle>;
    fn set_files(&self, files: Vec<FileHandle>);

    /// Force the control's `type` property.
    fn set_input_type(&self, input_type: &str);

    /// Semantic value attached to an `option`.
    fn data_value(&self) -> Option<Value>;
    fn set_data_value(&self, value: Value);

    /// Keep `binding` alive for as long as this element lives.
    ///
    /// An element keeps one binding per directive: retaining a binding for a
    /// directive it already holds drops the earlier one, so re-binding on
    /// update releases the old subscriptions.
    fn retain(&self, binding: Binding);
}

/// The browser window, for navigation the router does not handle.
pub trait Window: Send + Sync {
    /// Open `url` in a new browsing context.
    fn open(&self, url: &str);

    /// Perform a full page navigation to `url`.
    fn assign_location(&self, url: &str);
}
