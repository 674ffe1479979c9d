use tracing::debug;

use crate::error::ChartResult;
use crate::render::{Color, Pen, Renderer};

use super::chart_style::clamp_unit;
use super::{ChartContent, ChartStyle, ChartSurface};

impl<R: Renderer, C: ChartContent> ChartSurface<R, C> {
    /// Replaces the full style after validation and schedules a repaint.
    pub fn set_style(&mut self, style: ChartStyle) -> ChartResult<()> {
        style.validate()?;
        self.style = style;
        debug!("chart style updated");
        self.scheduler.schedule();
        Ok(())
    }

    pub fn set_border_pen(&mut self, pen: Pen) -> ChartResult<()> {
        self.update_style(|style| style.border_pen = pen)
    }

    pub fn set_background(&mut self, color: Color) -> ChartResult<()> {
        self.update_style(|style| style.background = color)
    }

    pub fn set_item_pen(&mut self, pen: Pen) -> ChartResult<()> {
        self.update_style(|style| style.item_pen = pen)
    }

    pub fn set_font_size_px(&mut self, font_size_px: f64) -> ChartResult<()> {
        self.update_style(|style| style.font_size_px = font_size_px)
    }

    pub fn set_highlight_text_color(&mut self, color: Color) -> ChartResult<()> {
        self.update_style(|style| style.highlight_text_color = color)
    }

    pub fn set_highlight_pen(&mut self, pen: Pen) -> ChartResult<()> {
        self.update_style(|style| style.highlight_pen = pen)
    }

    pub fn set_highlight_brush(&mut self, color: Color) -> ChartResult<()> {
        self.update_style(|style| style.highlight_brush = color)
    }

    /// Clamped into `[0, 1]`.
    pub fn set_highlight_alpha(&mut self, alpha: f64) {
        self.style.highlight_alpha = clamp_unit(alpha);
        self.scheduler.schedule();
    }

    /// Label template; `%1` is replaced by the formatted value. Empty restores plain numbers.
    pub fn set_text_format(&mut self, template: impl Into<String>) {
        self.style.text_format = template.into();
        self.scheduler.schedule();
    }

    pub fn set_zero_line_pen(&mut self, pen: Pen) -> ChartResult<()> {
        self.update_style(|style| style.zero_line_pen = pen)
    }

    #[must_use]
    pub fn antialiasing(&self) -> bool {
        self.antialiasing
    }

    pub fn set_antialiasing(&mut self, enabled: bool) {
        if self.antialiasing == enabled {
            return;
        }
        self.antialiasing = enabled;
        self.scheduler.schedule();
    }

    fn update_style(&mut self, apply: impl FnOnce(&mut ChartStyle)) -> ChartResult<()> {
        let mut style = self.style.clone();
        apply(&mut style);
        self.set_style(style)
    }
}
