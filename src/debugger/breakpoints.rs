use super::session::DebugSession;
use tracing::{debug, info};

/// The host's tick scheduler plus the hooks the debugger notifies.
pub trait HostScheduler {
    /// Stop (or restart) simulation time.
    fn set_frozen(&mut self, frozen: bool);

    fn breakpoint_hit(&mut self, _source: &str) {}

    fn resumed(&mut self) {}
}

impl<H: HostScheduler> DebugSession<H> {
    /// Entry point for the interpreter when execution reaches a breakpoint.
    ///
    /// Returns false, touching nothing, when debug mode is off.
    pub fn trigger(&mut self, source: &str) -> bool {
        if !self.state.debug_mode {
            debug!(source, "breakpoint ignored, debug mode is off");
            return false;
        }
        self.state.is_debugging = true;
        self.host.set_frozen(true);
        self.host.breakpoint_hit(source);
        info!(source, queued = self.queue.len(), "breakpoint hit");
        true
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.state.debug_mode = enabled;
        info!(enabled, "debug mode changed");
    }
}
