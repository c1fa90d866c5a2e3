//! Accessors and Bound Values
//!
//! Two-way directives never own the state they edit. They read and write it
//! through an [`Accessor`], a get/set capability pair supplied by the
//! template. Values cross that boundary as [`BoundValue`]s, one variant per
//! kind of form control.
//!
//! # Coercion
//!
//! Form controls speak strings. The helpers here convert between control
//! text and bound values the way browsers do:
//!
//! - numbers: blank text is `0`, unparsable text is `NaN`, integral values
//!   print without a fraction
//! - local date-times: `YYYY-MM-DDTHH:mm`, seconds accepted on input

use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Display format of a `datetime-local` control.
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// A file selected in a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// A value exchanged between a form control and its accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    /// No value (`null`/`undefined` on the state side).
    Empty,
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Files(Vec<FileHandle>),
    Number(f64),
    Text(String),
    /// Structured application data, as carried by select options.
    Data(Value),
}

impl BoundValue {
    /// Truthiness, as used for a checkbox's `checked` state.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Bool(value) => *value,
            Self::Number(value) => *value != 0.0 && !value.is_nan(),
            Self::Text(text) => !text.is_empty(),
            Self::Data(value) => match value {
                Value::Null => false,
                Value::Bool(value) => *value,
                Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
                Value::String(text) => !text.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
            Self::Date(_) | Self::DateTime(_) | Self::Files(_) => true,
        }
    }

    /// The calendar date, if this value carries one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::DateTime(date_time) => Some(date_time.date()),
            _ => None,
        }
    }

    /// The local date-time, if this value carries one. Dates map to midnight.
    pub fn as_date_time(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(date_time) => Some(*date_time),
            Self::Date(date) => date.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    /// The file list, empty for anything that is not one.
    pub fn into_files(self) -> Vec<FileHandle> {
        match self {
            Self::Files(files) => files,
            _ => Vec::new(),
        }
    }

    /// Text written into a text-like control. `Empty` becomes `""`.
    pub fn to_control_text(&self) -> String {
        match self {
            Self::Empty | Self::Files(_) => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::DateTime(date_time) => format_datetime_local(date_time),
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
            Self::Data(Value::Null) => String::new(),
            Self::Data(Value::String(text)) => text.clone(),
            Self::Data(value) => value.to_string(),
        }
    }

    /// The value as structured data, for matching against option data.
    pub fn to_data(&self) -> Value {
        match self {
            Self::Empty | Self::Files(_) => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Date(_) | Self::DateTime(_) => Value::String(self.to_control_text()),
            Self::Number(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(text) => Value::String(text.clone()),
            Self::Data(value) => value.clone(),
        }
    }
}

impl From<bool> for BoundValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for BoundValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Value> for BoundValue {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

/// Read/write capability for a piece of state owned elsewhere.
///
/// # Example
///
/// ```rust,ignore
/// let store = Arc::new(Mutex::new(BoundValue::from("hello")));
/// let (read, write) = (store.clone(), store.clone());
///
/// let accessor = Accessor::new(
///     move || read.lock().clone(),
///     move |value| *write.lock() = value,
/// );
/// ```
#[derive(Clone)]
pub struct Accessor {
    get: Arc<dyn Fn() -> BoundValue + Send + Sync>,
    set: Arc<dyn Fn(BoundValue) + Send + Sync>,
}

impl Accessor {
    pub fn new<G, S>(get: G, set: S) -> Self
    where
        G: Fn() -> BoundValue + Send + Sync + 'static,
        S: Fn(BoundValue) + Send + Sync + 'static,
    {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    pub fn get(&self) -> BoundValue {
        (self.get)()
    }

    pub fn set(&self, value: BoundValue) {
        (self.set)(value)
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor").finish_non_exhaustive()
    }
}

/// Format a number the way a browser writes it into a control.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        // Covers -0.0 as well.
        "0".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Coerce control text to a number: blank is `0`, garbage is `NaN`.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) =>
        {
            text.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Format a date-time for a `datetime-local` control.
pub fn format_datetime_local(value: &NaiveDateTime) -> String {
    value.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Parse the value of a `datetime-local` control.
pub fn parse_datetime_local(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
