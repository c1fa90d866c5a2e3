//! Animation Frames
//!
//! The click directive paints its pending text and then waits for the next
//! frame before running the handler, so the text change never races the
//! paint. A [`FrameSource`] supplies that tick.

use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};

/// Source of animation frame ticks.
pub trait FrameSource: Send + Sync {
    /// Resolve at the start of the next frame.
    fn next_frame(&self) -> BoxFuture<'static, ()>;
}

/// Frame clock driven by a fixed tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct IntervalFrames {
    interval: Duration,
}

impl IntervalFrames {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameSource for IntervalFrames {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        tokio::time::sleep(self.interval).boxed()
    }
}

/// Frame clock that only yields to the scheduler. Used when nothing paints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateFrames;

impl FrameSource for ImmediateFrames {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        tokio::task::yield_now().boxed()
    }
}
