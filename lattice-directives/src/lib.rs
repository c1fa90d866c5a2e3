//! Lattice Directives
//!
//! This crate provides the attribute directives of the Lattice UI framework:
//! the layer that turns template attributes such as `ui-click`, `ui-href` or
//! `$ui-value` into live DOM listeners, router links and two-way form
//! bindings.
//!
//! It implements:
//!
//! - Async click handling that suppresses repeated clicks while pending
//! - Focus forwarding
//! - Router-aware links and active-link markers
//! - Element ids and component slots
//! - Two-way binding of form controls to state accessors
//!
//! Template parsing, the router's route tree and the DOM itself are not part
//! of this crate. They are reached through the traits in [`dom`] and
//! [`router`], with in-memory implementations in `dom::headless` and
//! `router::headless`.
//!
//! # Architecture
//!
//! - `registry`: name → directive mapping consulted by the template engine
//! - `directive`: the built-in directives and their bind-time inputs
//! - `binding`: subscriptions owned by an element's bindings
//! - `accessor`: state accessors and the values they exchange
//! - `dom`, `router`, `frame`: interfaces to the outside world
//!
//! # Example
//!
//! ```rust,ignore
//! use lattice_directives::directive::{names, BindTarget, DirectiveEnv, DirectiveValue};
//! use lattice_directives::DirectiveRegistry;
//!
//! let env = DirectiveEnv::new(router, window, tokio::runtime::Handle::current());
//! let registry = DirectiveRegistry::install_global(DirectiveRegistry::with_builtin(&env))?;
//!
//! // For <button ui-click={save}>Save</button>
//! registry.bind(
//!     names::CLICK,
//!     BindTarget::new(button, "button", DirectiveValue::async_handler(|_| save())),
//! )?;
//! ```

pub mod accessor;
pub mod binding;
pub mod config;
pub mod directive;
pub mod dom;
pub mod error;
pub mod frame;
pub mod registry;
pub mod router;

pub use accessor::{Accessor, BoundValue};
pub use binding::{Binding, Subscription};
pub use config::DirectiveConfig;
pub use directive::{BindTarget, Directive, DirectiveEnv, DirectiveValue};
pub use error::{DirectiveError, HandlerError, Result};
pub use registry::DirectiveRegistry;
