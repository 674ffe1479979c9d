use serde::{Deserialize, Serialize};

use crate::core::{CellRef, PixelPoint, PixelRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Notification emitted to the application shell; `None` means "no cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartEvent {
    /// Hover moved to a different cell, or left all cells.
    Entered(Option<CellRef>),
    Pressed(Option<CellRef>),
    Clicked(Option<CellRef>),
    DoubleClicked(Option<CellRef>),
}

/// Observer for chart notifications.
pub trait ChartListener {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: ChartEvent);
}

/// The single highlighted item of the last paint pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub cell: CellRef,
    pub rect: PixelRect,
    pub value: f64,
}

/// Pointer and hover state owned by a chart surface.
///
/// `position` is the raw pointer sample; `hovered` is only written by a paint
/// pass (or cleared by leave/resize), never resolved at move time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    position: Option<PixelPoint>,
    hovered: Option<Highlight>,
    pressed: Option<Option<CellRef>>,
}

impl PointerState {
    #[must_use]
    pub fn position(self) -> Option<PixelPoint> {
        self.position
    }

    #[must_use]
    pub fn hovered(self) -> Option<Highlight> {
        self.hovered
    }

    #[must_use]
    pub fn hovered_cell(self) -> Option<CellRef> {
        self.hovered.map(|highlight| highlight.cell)
    }

    /// Cell recorded at the last primary press, if a press is in progress.
    #[must_use]
    pub fn pressed_cell(self) -> Option<Option<CellRef>> {
        self.pressed
    }

    pub fn on_pointer_move(&mut self, position: PixelPoint) {
        self.position = Some(position);
    }

    /// Drops pointer, hover, and press state (pointer leave or geometry change).
    pub fn reset(&mut self) {
        self.position = None;
        self.hovered = None;
        self.pressed = None;
    }

    /// Stores the hover result of a paint pass.
    ///
    /// Returns `true` when the hovered cell changed identity.
    pub fn set_hovered(&mut self, hovered: Option<Highlight>) -> bool {
        let changed = self.hovered_cell() != hovered.map(|highlight| highlight.cell);
        self.hovered = hovered;
        changed
    }

    /// Records the currently hovered cell as the press target and returns it.
    pub fn on_press(&mut self) -> Option<CellRef> {
        let cell = self.hovered_cell();
        self.pressed = Some(cell);
        cell
    }

    /// Completes a press; yields the clicked cell when release happens over the press target.
    pub fn on_release(&mut self) -> Option<Option<CellRef>> {
        let pressed = self.pressed.take()?;
        let hovered = self.hovered_cell();
        (pressed == hovered).then_some(hovered)
    }
}
