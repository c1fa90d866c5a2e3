//! Shared fixtures for directive unit tests.

use std::sync::Arc;

use tokio::runtime::Handle;

use super::DirectiveEnv;
use crate::dom::headless::{HeadlessElement, HeadlessHost, HeadlessWindow};
use crate::dom::HostComponent;
use crate::frame::ImmediateFrames;
use crate::router::headless::HeadlessRouter;
use crate::router::RouterFlavor;

pub(crate) struct Fixture {
    pub env: DirectiveEnv,
    pub router: Arc<HeadlessRouter>,
    pub window: Arc<HeadlessWindow>,
    pub host: Arc<HeadlessHost>,
}

impl Fixture {
    /// Must be called inside a tokio runtime.
    pub fn new(flavor: RouterFlavor) -> Self {
        let router = HeadlessRouter::new(flavor);
        let window = HeadlessWindow::new();
        let env = DirectiveEnv::new(router.clone(), window.clone(), Handle::current())
            .with_frames(Arc::new(ImmediateFrames));

        Self {
            env,
            router,
            window,
            host: HeadlessHost::new(),
        }
    }

    /// An element rendered by the fixture's host.
    pub fn element(&self, tag: &str) -> Arc<HeadlessElement> {
        let host: Arc<dyn HostComponent> = self.host.clone();
        HeadlessElement::hosted(tag, &host)
    }
}

/// Let spawned tasks run until they block.
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
