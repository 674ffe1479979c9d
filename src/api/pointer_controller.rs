use tracing::{debug, trace};

use crate::core::{PixelPoint, Viewport};
use crate::interaction::{ChartEvent, PointerButton};
use crate::render::Renderer;

use super::{ChartContent, ChartSurface};

impl<R: Renderer, C: ChartContent> ChartSurface<R, C> {
    /// Stores the raw pointer sample; hover is resolved by the next paint pass.
    pub fn pointer_move(&mut self, x: i32, y: i32) {
        let position = PixelPoint::new(x, y);
        if self.pointer.position() == Some(position) {
            return;
        }
        trace!(x, y, "pointer moved");
        self.pointer.on_pointer_move(position);
        self.scheduler.schedule();
    }

    pub fn pointer_leave(&mut self) {
        debug!("pointer left chart");
        self.pointer.reset();
        self.scheduler.schedule();
    }

    /// Applies a new widget size; pointer and hover state are dropped immediately.
    pub fn resize(&mut self, viewport: Viewport) {
        debug!(
            width = viewport.width,
            height = viewport.height,
            "chart resized"
        );
        self.viewport = viewport;
        self.pointer.reset();
        self.scheduler.schedule();
    }

    pub fn pointer_press(&mut self, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        let cell = self.pointer.on_press();
        self.emit_event(ChartEvent::Pressed(cell));
    }

    /// Emits `Clicked` only when the release lands on the cell recorded at press.
    pub fn pointer_release(&mut self, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        if let Some(cell) = self.pointer.on_release() {
            self.emit_event(ChartEvent::Clicked(cell));
        }
    }

    pub fn pointer_double_click(&mut self, button: PointerButton) {
        if button != PointerButton::Primary {
            return;
        }
        let cell = self.pointer.hovered_cell();
        self.emit_event(ChartEvent::DoubleClicked(cell));
    }

    #[must_use]
    pub fn pointer_position(&self) -> Option<PixelPoint> {
        self.pointer.position()
    }
}
