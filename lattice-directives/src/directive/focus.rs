//! Focus Directive
//!
//! `ui-focus` forwards focus events to a synchronous handler and keeps them
//! from bubbling. There is no pending state; handlers are expected to be
//! quick.

use std::sync::Arc;

use tracing::debug;

use super::{names, BindTarget, Directive, DirectiveValue};
use crate::binding::Binding;
use crate::dom::{Event, EventKind};
use crate::error::{DirectiveError, Result};

/// The `ui-focus` directive.
#[derive(Debug, Default, Clone, Copy)]
pub struct FocusDirective;

impl Directive for FocusDirective {
    fn name(&self) -> &'static str {
        names::FOCUS
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        let DirectiveValue::Handler(handler) = target.value else {
            return Err(DirectiveError::InvalidValue {
                directive: names::FOCUS,
                expected: "a focus handler",
            });
        };

        debug!(tag = %target.tag, "binding ui-focus");

        target.element.set_listener(
            EventKind::Focus,
            Arc::new(move |event: &Event| {
                handler(event);
                event.stop_propagation();
            }),
        );

        Ok(Binding::new(names::FOCUS))
    }
}
