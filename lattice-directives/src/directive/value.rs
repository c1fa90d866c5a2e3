//! Value Directives
//!
//! Two directives cooperate to bind form controls to application state:
//!
//! - `ui-value` tags an `<option>` with the semantic value it stands for and
//!   gives it an opaque random DOM value, so the real value never reaches
//!   the DOM and unrelated options never collide.
//! - `$ui-value` binds any other control to an [`Accessor`] in both
//!   directions.
//!
//! Using either on the wrong tag is a template mistake and fails at bind
//! time, naming the other directive.
//!
//! # Control Kinds
//!
//! `$ui-value` decides the control's [`ControlKind`] once, at bind time,
//! from the `type` attribute and the tag:
//!
//! | kind | initial write | written back on | value |
//! |---|---|---|---|
//! | checkbox | `checked` | change | bool |
//! | date | `value_as_date` | change | date |
//! | datetime-local | `YYYY-MM-DDTHH:mm` text | change | date-time |
//! | file | `files` | change | file list |
//! | select | matching option's DOM value | change | option data |
//! | number | numeric text | blur | number |
//! | text | text, blank for empty | blur | text |
//!
//! After every write the optional `ui-change` callback receives the value
//! just written.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{attributes, names, BindTarget, ChangeCallback, Directive, DirectiveEnv, DirectiveValue};
use crate::accessor::{self, Accessor, BoundValue};
use crate::binding::Binding;
use crate::dom::{ElementRef, Event, EventKind, WeakElement};
use crate::error::{DirectiveError, Result};

const OPTION_TAG: &str = "option";

/// One entry of a select's option tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// The option's DOM value.
    pub value: String,
    /// The application value the option stands for.
    pub data_value: Value,
    /// Options of a nested group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OptionEntry>,
}

impl OptionEntry {
    pub fn new(value: impl Into<String>, data_value: Value) -> Self {
        Self {
            value: value.into(),
            data_value,
            children: Vec::new(),
        }
    }

    /// An option group holding `children`.
    pub fn group(value: impl Into<String>, children: Vec<OptionEntry>) -> Self {
        Self {
            value: value.into(),
            data_value: Value::Null,
            children,
        }
    }

    /// Entry for an `<option>` element bound with `ui-value`.
    pub fn from_element(element: &ElementRef) -> Self {
        Self::new(element.value(), element.data_value().unwrap_or(Value::Null))
    }

    /// Whether this entry is an option group rather than a selectable option.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first search of `entries`; the first match wins. Groups are
    /// searched through but never match themselves.
    pub fn find<'a, P>(entries: &'a [OptionEntry], predicate: &P) -> Option<&'a OptionEntry>
    where
        P: Fn(&OptionEntry) -> bool,
    {
        entries.iter().find_map(|entry| {
            if entry.is_group() {
                Self::find(&entry.children, predicate)
            } else if predicate(entry) {
                Some(entry)
            } else {
                None
            }
        })
    }

    /// The entry whose DOM value is `value`.
    pub fn find_by_value<'a>(entries: &'a [OptionEntry], value: &str) -> Option<&'a OptionEntry> {
        Self::find(entries, &|entry| entry.value == value)
    }

    /// The entry standing for `data`, see [`data_matches`].
    pub fn find_by_data<'a>(entries: &'a [OptionEntry], data: &Value) -> Option<&'a OptionEntry> {
        Self::find(entries, &|entry| data_matches(&entry.data_value, data))
    }
}

/// Whether an option's data stands for `wanted`.
///
/// Values are equal, or both are objects with equal `id` fields. Objects
/// without an `id` only match an equal object. Numbers compare by value, so
/// `5` and `5.0` match.
pub fn data_matches(candidate: &Value, wanted: &Value) -> bool {
    if same_value(candidate, wanted) {
        return true;
    }

    match (candidate, wanted) {
        (Value::Object(candidate), Value::Object(wanted)) => {
            match (candidate.get("id"), wanted.get("id")) {
                (Some(left), Some(right)) => same_value(left, right),
                _ => false,
            }
        }
        _ => false,
    }
}

fn same_value(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => left.as_f64() == right.as_f64(),
        _ => left == right,
    }
}

/// The `ui-value` directive, for `<option>` elements.
pub struct OptionValueDirective {
    env: DirectiveEnv,
}

impl OptionValueDirective {
    pub fn new(env: DirectiveEnv) -> Self {
        Self { env }
    }
}

/// A random hex string of `length` digits.
fn opaque_value(length: usize) -> String {
    let mut value = Uuid::new_v4().simple().to_string();
    value.truncate(length);
    value
}

impl Directive for OptionValueDirective {
    fn name(&self) -> &'static str {
        names::OPTION_VALUE
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        if target.tag != OPTION_TAG {
            return Err(DirectiveError::WrongTag {
                directive: names::OPTION_VALUE,
                tag: target.tag,
                alternative: names::BOUND_VALUE,
            });
        }

        let data = match target.value {
            DirectiveValue::Data(value) => value,
            DirectiveValue::Text(text) => Value::String(text),
            DirectiveValue::Flag(flag) => Value::Bool(flag),
            _ => {
                return Err(DirectiveError::InvalidValue {
                    directive: names::OPTION_VALUE,
                    expected: "option data",
                })
            }
        };

        target.element.set_data_value(data);
        target
            .element
            .set_value(&opaque_value(self.env.config.option_value_length()));

        Ok(Binding::new(names::OPTION_VALUE))
    }
}

/// Form control kinds handled by `$ui-value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Checkbox,
    Date,
    DateTimeLocal,
    File,
    Select,
    Number,
    Text,
}

impl ControlKind {
    /// Classify a control. The `type` attribute wins over the tag, except
    /// that `number` is only considered for non-`select` elements.
    pub fn detect(tag: &str, input_type: Option<&str>) -> Self {
        match input_type {
            Some("checkbox") => Self::Checkbox,
            Some("date") => Self::Date,
            Some("datetime-local") => Self::DateTimeLocal,
            Some("file") => Self::File,
            _ if tag == "select" => Self::Select,
            Some("number") => Self::Number,
            _ => Self::Text,
        }
    }

    /// The event that writes the control's value back.
    pub fn commit_event(&self) -> EventKind {
        match self {
            Self::Number | Self::Text => EventKind::Blur,
            _ => EventKind::Change,
        }
    }

    /// The input type forced onto the control, if any.
    fn forced_input_type(&self) -> Option<&'static str> {
        match self {
            Self::Date => Some("date"),
            Self::DateTimeLocal => Some("datetime-local"),
            Self::File => Some("file"),
            _ => None,
        }
    }
}

/// The `$ui-value` directive, for form controls.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundValueDirective;

/// Live state of one two-way bound control.
struct BoundControl {
    element: WeakElement,
    kind: ControlKind,
    accessor: Accessor,
    on_change: Option<ChangeCallback>,
    options: Vec<OptionEntry>,
}

impl BoundControl {
    /// Write the accessor's value into the control.
    fn write_initial(&self, element: &ElementRef) {
        let current = self.accessor.get();

        match self.kind {
            ControlKind::Checkbox => element.set_checked(current.as_bool()),
            ControlKind::Date => element.set_value_as_date(current.as_date()),
            ControlKind::DateTimeLocal => {
                if let Some(date_time) = current.as_date_time() {
                    element.set_value(&accessor::format_datetime_local(&date_time));
                }
            }
            ControlKind::File => element.set_files(current.into_files()),
            ControlKind::Select => {
                match OptionEntry::find_by_data(&self.options, &current.to_data()) {
                    Some(entry) => element.set_value(&entry.value),
                    None => debug!("no option matches the bound value, keeping default selection"),
                }
            }
            ControlKind::Number | ControlKind::Text => element.set_value(&current.to_control_text()),
        }
    }

    /// Read the control's value, `None` when it stands for nothing.
    fn read(&self, element: &ElementRef) -> Option<BoundValue> {
        let value = match self.kind {
            ControlKind::Checkbox => BoundValue::Bool(element.checked()),
            ControlKind::Date => element
                .value_as_date()
                .map(BoundValue::Date)
                .unwrap_or(BoundValue::Empty),
            ControlKind::DateTimeLocal => {
                let text = element.value();
                match accessor::parse_datetime_local(&text) {
                    Some(date_time) => BoundValue::DateTime(date_time),
                    None => {
                        if !text.is_empty() {
                            warn!(value = %text, "unparsable datetime-local value");
                        }
                        BoundValue::Empty
                    }
                }
            }
            ControlKind::File => BoundValue::Files(element.files()),
            ControlKind::Select => {
                let selected = element.value();
                match OptionEntry::find_by_value(&self.options, &selected) {
                    Some(entry) => BoundValue::Data(entry.data_value.clone()),
                    None => {
                        warn!(value = %selected, "selected value matches no option");
                        return None;
                    }
                }
            }
            ControlKind::Number => BoundValue::Number(accessor::parse_number(&element.value())),
            ControlKind::Text => BoundValue::Text(element.value()),
        };

        Some(value)
    }

    /// Write the control's value to the accessor and notify `ui-change`.
    fn commit(&self) {
        let Some(element) = self.element.upgrade() else {
            return;
        };
        let Some(value) = self.read(&element) else {
            return;
        };

        self.accessor.set(value.clone());
        if let Some(on_change) = &self.on_change {
            on_change(&value);
        }
    }
}

impl Directive for BoundValueDirective {
    fn name(&self) -> &'static str {
        names::BOUND_VALUE
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        if target.tag == OPTION_TAG {
            return Err(DirectiveError::WrongTag {
                directive: names::BOUND_VALUE,
                tag: target.tag,
                alternative: names::OPTION_VALUE,
            });
        }

        let DirectiveValue::Accessor(accessor) = target.value else {
            return Err(DirectiveError::InvalidValue {
                directive: names::BOUND_VALUE,
                expected: "an accessor",
            });
        };

        let kind = ControlKind::detect(&target.tag, target.attributes.text(attributes::TYPE));
        debug!(
            tag = %target.tag,
            ?kind,
            commit = kind.commit_event().as_str(),
            "binding $ui-value"
        );

        let control = Arc::new(BoundControl {
            element: Arc::downgrade(&target.element),
            kind,
            accessor,
            on_change: target.attributes.callback(attributes::CHANGE).cloned(),
            options: target.content,
        });

        if let Some(input_type) = kind.forced_input_type() {
            target.element.set_input_type(input_type);
        }
        control.write_initial(&target.element);

        let listener = control.clone();
        target.element.set_listener(
            kind.commit_event(),
            Arc::new(move |_: &Event| listener.commit()),
        );

        Ok(Binding::new(names::BOUND_VALUE))
    }
}
