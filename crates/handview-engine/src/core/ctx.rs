use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::InputFrame;
use crate::paint::Color;
use crate::time::HostTick;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Sets the window title. Skips the platform call when the title is unchanged.
    pub fn set_title(&self, title: &str) {
        if self.window.title() != title {
            self.window.set_title(title);
        }
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:       WindowCtx<'a>,
    pub gpu:          &'a mut Gpu<'w>,
    pub input_frame:  &'a InputFrame,
    pub tick:         HostTick,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears the surface with `clear` and presents the frame.
    pub fn present(&mut self, clear: Color) -> AppControl {
        self.window.window.pre_present_notify();
        match self.gpu.present_clear(clear) {
            Err(SurfaceErrorAction::Fatal) => AppControl::Exit,
            _ => AppControl::Continue,
        }
    }
}
