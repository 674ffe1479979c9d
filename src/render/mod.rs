mod frame;
mod null_renderer;
mod paint_stage;
mod primitives;

pub use frame::{DrawCommand, Primitive, RenderFrame};
pub use null_renderer::NullRenderer;
pub use paint_stage::PaintStage;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, Pen, PolylinePrimitive, RectPrimitive, TextHAlign,
    TextPrimitive, estimate_text_width_px,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, ordered `RenderFrame` so drawing
/// code stays isolated from layout and hit-testing.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
