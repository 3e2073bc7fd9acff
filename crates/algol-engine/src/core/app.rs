use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the studio.
///
/// All callbacks run on the event-loop thread, one at a time.
pub trait App {
    /// Called once after the window and GPU exist, before the first frame.
    ///
    /// Returning an error aborts the runtime.
    fn on_start(&mut self, runtime: &mut RuntimeCtx) -> anyhow::Result<()> {
        let _ = runtime;
        Ok(())
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once when the window closes or the runtime exits.
    fn on_exit(&mut self) {}
}
