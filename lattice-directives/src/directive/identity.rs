//! Identity Directive
//!
//! `id=".field"` hands the element to the hosting component under `field`;
//! any other value becomes the element's DOM id.

use tracing::{debug, warn};

use super::{names, BindTarget, Directive, DirectiveValue};
use crate::binding::Binding;
use crate::error::{DirectiveError, Result};

/// The `id` directive.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityDirective;

impl Directive for IdentityDirective {
    fn name(&self) -> &'static str {
        names::IDENTITY
    }

    fn bind(&self, target: BindTarget) -> Result<Binding> {
        let DirectiveValue::Text(value) = target.value else {
            return Err(DirectiveError::InvalidValue {
                directive: names::IDENTITY,
                expected: "an id or a `.slot` name",
            });
        };

        match value.strip_prefix('.') {
            Some(slot) => match target.element.host() {
                Some(host) => {
                    debug!(slot, "assigning element to component slot");
                    host.assign_slot(slot, target.element.clone());
                }
                None => warn!(slot, "element has no hosting component, slot not assigned"),
            },
            None => target.element.set_id(&value),
        }

        Ok(Binding::new(names::IDENTITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::headless::{HeadlessElement, HeadlessHost};
    use crate::dom::{ElementRef, HostComponent};
    use std::sync::Arc;

    #[test]
    fn plain_value_sets_the_id() {
        let element = HeadlessElement::new("section");

        IdentityDirective
            .bind(BindTarget::new(element.clone(), "section", DirectiveValue::text("intro")))
            .unwrap();

        assert_eq!(element.id().as_deref(), Some("intro"));
    }

    #[test]
    fn dotted_value_assigns_component_slot() {
        let host = HeadlessHost::new();
        let dyn_host: Arc<dyn HostComponent> = host.clone();
        let element = HeadlessElement::hosted("canvas", &dyn_host);

        IdentityDirective
            .bind(BindTarget::new(element.clone(), "canvas", DirectiveValue::text(".chart")))
            .unwrap();

        let slot = host.slot("chart").expect("slot assigned");
        let element: ElementRef = element;
        assert!(Arc::ptr_eq(&slot, &element));
        assert!(host.slot(".chart").is_none());
    }

    #[test]
    fn dotted_value_without_host_is_ignored() {
        let element = HeadlessElement::new("canvas");

        let binding = IdentityDirective
            .bind(BindTarget::new(element.clone(), "canvas", DirectiveValue::text(".chart")))
            .unwrap();

        assert_eq!(binding.subscription_count(), 0);
        assert!(element.id().is_none());
    }
}
