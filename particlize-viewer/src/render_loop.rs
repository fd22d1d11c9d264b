//! Continuous render loop controller
//!
//! The free-running callback chain is modelled as an explicit controller
//! owning a single cancellable scheduling token. `start` and `stop` are
//! both idempotent, so callers never need to reason about whether a loop
//! is already active; at most one token is outstanding at any time.

use crate::collaborators::{FrameScheduler, FrameToken};

/// Owns the at-most-one outstanding frame token of a session
#[derive(Debug, Default)]
pub struct RenderLoop {
    token: Option<FrameToken>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self { token: None }
    }

    /// Begin (or restart) the loop. Any existing token is cancelled
    /// before a new one is issued, so calling this twice in a row never
    /// yields two concurrent loops.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(token) = self.token.take() {
            scheduler.cancel_frame(token);
        }
        self.token = Some(scheduler.request_frame());
    }

    /// Cancel the outstanding token, if any. Stopping an already-stopped
    /// loop is a no-op, not an error.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(token) = self.token.take() {
            scheduler.cancel_frame(token);
        }
    }

    pub fn is_running(&self) -> bool {
        self.token.is_some()
    }

    /// Continue the chain after a frame callback fired: the fired token
    /// was consumed by delivery, so request the next one. Callbacks
    /// arriving while stopped are discarded by the caller checking
    /// [`Self::is_running`] first.
    pub fn advance(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.token.is_some() {
            self.token = Some(scheduler.request_frame());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::CountingScheduler;

    #[test]
    fn repeated_start_leaves_one_outstanding_token() {
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        for _ in 0..5 {
            render_loop.start(&mut scheduler);
        }
        assert_eq!(scheduler.outstanding(), 1);
        assert!(render_loop.is_running());

        render_loop.stop(&mut scheduler);
        assert_eq!(scheduler.outstanding(), 0);
        assert!(!render_loop.is_running());
    }

    #[test]
    fn stop_when_stopped_is_a_noop() {
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        render_loop.stop(&mut scheduler);
        assert_eq!(scheduler.outstanding(), 0);
    }

    #[test]
    fn advance_keeps_exactly_one_token() {
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        render_loop.start(&mut scheduler);
        assert!(scheduler.fire().is_some());
        render_loop.advance(&mut scheduler);
        assert_eq!(scheduler.outstanding(), 1);
    }

    #[test]
    fn advance_when_stopped_requests_nothing() {
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        render_loop.advance(&mut scheduler);
        assert_eq!(scheduler.outstanding(), 0);
    }
}
