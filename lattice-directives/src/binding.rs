//! Bindings and Subscriptions
//!
//! A [`Binding`] is what a directive leaves behind on an element. It owns
//! the element's external subscriptions (router listeners), and dropping it
//! releases them. The registry hands every binding to its element, so the
//! subscriptions live exactly as long as the element does.

use smallvec::SmallVec;

/// Handle to a registered external listener.
///
/// Dropping this handle unregisters the listener.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Create a subscription that runs `release` when dropped.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// The live state a directive attaches to an element.
#[derive(Debug)]
pub struct Binding {
    directive: &'static str,
    subscriptions: SmallVec<[Subscription; 1]>,
}

impl Binding {
    /// A binding with no external subscriptions.
    pub fn new(directive: &'static str) -> Self {
        Self {
            directive,
            subscriptions: SmallVec::new(),
        }
    }

    /// Take ownership of a subscription.
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscriptions.push(subscription);
        self
    }

    /// Name of the directive that produced this binding.
    pub fn directive(&self) -> &'static str {
        self.directive
    }

    /// Number of subscriptions this binding keeps alive.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
