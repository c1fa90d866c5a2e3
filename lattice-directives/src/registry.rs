//! Directive Registry
//!
//! The registry maps attribute names to directives. The template engine
//! consults it for every directive attribute it finds and binds the element
//! through it.
//!
//! # Lifecycle
//!
//! A registry is filled once at startup and read from then on; directives
//! are never removed. An application usually installs one process-wide
//! registry with [`DirectiveRegistry::install_global`] while the component
//! system initializes. Registries can also be used as plain values, which is
//! what tests do.
//!
//! # Element Lifetime
//!
//! [`DirectiveRegistry::bind`] hands each [`Binding`] to its element. The
//! element drops it when it goes away, releasing any router subscriptions
//! the directive made.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::binding::Binding;
use crate::directive::{self, BindTarget, Directive, DirectiveEnv};
use crate::error::{DirectiveError, Result};

// Process-wide registry, written once during component-system init.
static GLOBAL: OnceLock<DirectiveRegistry> = OnceLock::new();

/// Name → directive mapping.
#[derive(Default)]
pub struct DirectiveRegistry {
    directives: HashMap<&'static str, Arc<dyn Directive>>,
}

impl DirectiveRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in directive.
    pub fn with_builtin(env: &DirectiveEnv) -> Self {
        let mut registry = Self::new();
        for directive in directive::builtin(env) {
            registry.register(directive);
        }
        registry
    }

    /// Register `directive` under its own name.
    ///
    /// A directive registered under a taken name replaces the earlier one.
    pub fn register(&mut self, directive: Arc<dyn Directive>) -> &mut Self {
        let name = directive.name();
        if self.directives.insert(name, directive).is_some() {
            warn!(name, "directive replaced");
        } else {
            debug!(name, "directive registered");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Directive>> {
        self.directives.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.directives.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Bind the directive registered as `name` and return its binding.
    pub fn bind_detached(&self, name: &str, target: BindTarget) -> Result<Binding> {
        let directive = self
            .get(name)
            .ok_or_else(|| DirectiveError::UnknownDirective(name.to_string()))?;

        directive.bind(target)
    }

    /// Bind the directive registered as `name` and let the element keep the
    /// binding alive.
    pub fn bind(&self, name: &str, target: BindTarget) -> Result<()> {
        let element = target.element.clone();
        let binding = self.bind_detached(name, target)?;
        element.retain(binding);
        Ok(())
    }

    /// Install `registry` as the process-wide registry.
    pub fn install_global(registry: DirectiveRegistry) -> Result<&'static DirectiveRegistry> {
        GLOBAL
            .set(registry)
            .map_err(|_| DirectiveError::AlreadyInstalled)?;

        GLOBAL.get().ok_or(DirectiveError::AlreadyInstalled)
    }

    /// The process-wide registry, once installed.
    pub fn global() -> Option<&'static DirectiveRegistry> {
        GLOBAL.get()
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("directives", &self.names())
            .finish()
    }
}
