use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    CoordinateAxis, LayoutItem, LinearAxis, Orientation, PixelPoint, PixelRect, RowHeader,
    SlotLayout, TREND_HIT_RADIUS_PX, Viewport, project_grouped, project_stacked, project_trend,
    resolve_bar_thickness, slot_width,
};
use crate::error::ChartResult;
use crate::interaction::Highlight;
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, Pen, RectPrimitive, Renderer, TextHAlign,
    TextPrimitive, estimate_text_width_px,
};

use super::bar_painter::{paint_bars, paint_trend};
use super::chart_style::clamp_unit;
use super::value_format::format_value;
use super::{ChartContent, ChartSurface, PaintContext};

const MIN_BAR_SCALE: f64 = 0.1;
const CALLOUT_MARGIN_PX: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartMode {
    #[default]
    Stacked,
    /// Side-by-side bars per category.
    Grouped,
    /// One polyline per row with point markers.
    Trend,
}

/// Bar sizing and appearance knobs. Values are always kept in range by the setters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarLayoutParams {
    pub mode: ChartMode,
    pub min_thickness_px: i32,
    pub max_thickness_px: i32,
    pub scale: f64,
    pub opacity: f64,
}

impl Default for BarLayoutParams {
    fn default() -> Self {
        Self {
            mode: ChartMode::Stacked,
            min_thickness_px: 0,
            max_thickness_px: i32::MAX,
            scale: 0.5,
            opacity: 1.0,
        }
    }
}

impl BarLayoutParams {
    /// Returns a copy with every field clamped to its valid range.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let min_thickness_px = self.min_thickness_px.max(0);
        Self {
            mode: self.mode,
            min_thickness_px,
            max_thickness_px: self.max_thickness_px.max(min_thickness_px),
            scale: clamp_scale(self.scale),
            opacity: clamp_unit(self.opacity),
        }
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale >= MIN_BAR_SCALE {
        scale.min(1.0)
    } else {
        MIN_BAR_SCALE
    }
}

/// Bar/trend content for a `ChartSurface`.
///
/// Sizes category slots from the horizontal axis, anchors bars at the pixel
/// of value zero on the vertical axis, and dispatches to the layout of the
/// active mode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarChartEngine {
    params: BarLayoutParams,
}

impl BarChartEngine {
    #[must_use]
    pub fn new(params: BarLayoutParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    #[must_use]
    pub fn params(&self) -> BarLayoutParams {
        self.params
    }

    #[must_use]
    pub fn mode(&self) -> ChartMode {
        self.params.mode
    }

    pub fn set_mode(&mut self, mode: ChartMode) {
        self.params.mode = mode;
    }

    /// `min` is raised to 0; `max` is raised to `min`.
    pub fn set_thickness_bounds(&mut self, min_px: i32, max_px: i32) {
        self.params.min_thickness_px = min_px.max(0);
        self.params.max_thickness_px = max_px.max(self.params.min_thickness_px);
    }

    #[must_use]
    pub fn thickness_bounds(&self) -> (i32, i32) {
        (self.params.min_thickness_px, self.params.max_thickness_px)
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.params.scale = clamp_scale(scale);
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.params.scale
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.params.opacity = clamp_unit(opacity);
    }

    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.params.opacity
    }

    /// Slot partition for the current grid and axes, or `None` when there is nothing to lay out.
    #[must_use]
    pub fn slot_layout(
        &self,
        categories: usize,
        rows: usize,
        category_axis: &dyn CoordinateAxis,
    ) -> Option<SlotLayout> {
        if categories == 0 || rows == 0 {
            return None;
        }
        let (span_start, span_end) = category_axis.usable_span();
        let slot_width = slot_width(span_start, span_end, categories);
        Some(SlotLayout {
            categories,
            rows,
            span_start,
            slot_width,
            bar_thickness: resolve_bar_thickness(
                slot_width,
                self.params.scale,
                self.params.min_thickness_px,
                self.params.max_thickness_px,
            ),
        })
    }

    /// Paints one bar (or one trend marker).
    pub fn draw_segment(&self, ctx: &mut PaintContext<'_>, item: &LayoutItem, highlighted: bool) {
        let style = ctx.style;
        let (pen, brush) = if highlighted {
            (
                style.highlight_pen,
                style.highlight_brush.faded(style.highlight_alpha),
            )
        } else {
            (style.item_pen, row_header(ctx, item).background)
        };
        let pen = pen.faded(self.params.opacity);
        let brush = brush.faded(self.params.opacity);

        if self.params.mode == ChartMode::Trend {
            let anchor = item.rect.top_left();
            ctx.frame.push_circle(CirclePrimitive::new(
                f64::from(anchor.x),
                f64::from(anchor.y),
                f64::from(TREND_HIT_RADIUS_PX),
                brush,
                pen,
            ));
            return;
        }

        ctx.frame
            .push_rect(pixel_rect_primitive(item.rect, brush).with_border(pen));
    }

    /// Paints the value label of one item, with a callout frame where the mode asks for one.
    pub fn draw_value(&self, ctx: &mut PaintContext<'_>, item: &LayoutItem, highlighted: bool) {
        let style = ctx.style;
        let text = format_value(item.value, &style.text_format);
        if text.is_empty() {
            return;
        }
        let text_size = label_size(&text, style.font_size_px);

        let text_rect = match self.params.mode {
            ChartMode::Grouped => {
                let top = if item.value < 0.0 {
                    item.rect.bottom()
                } else {
                    item.rect.top.saturating_sub(text_size.y)
                };
                PixelRect::new(item.rect.left, top, item.rect.width, text_size.y)
            }
            ChartMode::Stacked => {
                if highlighted
                    && (text_size.y > item.rect.height || text_size.x > item.rect.width)
                {
                    self.draw_callout(ctx, item.rect, text_size);
                }
                item.rect
            }
            ChartMode::Trend => {
                let centered = PixelRect::new(0, 0, text_size.x, text_size.y)
                    .centered_on(item.rect.top_left());
                let shift = if item.value < 0.0 {
                    text_size.y
                } else {
                    -text_size.y
                };
                let rect = PixelRect::new(
                    centered.left,
                    centered.top.saturating_add(shift),
                    centered.width,
                    centered.height,
                );
                if highlighted {
                    self.draw_callout(ctx, rect, text_size);
                }
                rect
            }
        };

        let color = if highlighted {
            style.highlight_text_color
        } else {
            row_header(ctx, item).foreground
        };
        let center = text_rect.center();
        ctx.frame.push_text(TextPrimitive::new(
            text,
            f64::from(center.x),
            f64::from(center.y) - f64::from(text_size.y) / 2.0,
            style.font_size_px,
            color.faded(self.params.opacity),
            TextHAlign::Center,
        ));
    }

    fn draw_callout(&self, ctx: &mut PaintContext<'_>, anchor: PixelRect, text_size: PixelPoint) {
        let style = ctx.style;
        let frame_rect = PixelRect::new(0, 0, text_size.x, text_size.y)
            .inflated(CALLOUT_MARGIN_PX)
            .centered_on(anchor.center());
        ctx.frame.push_rect(
            pixel_rect_primitive(frame_rect, style.highlight_brush.faded(self.params.opacity))
                .with_border(Pen::solid(
                    style.highlight_text_color.faded(self.params.opacity),
                )),
        );
    }

    /// Horizontal reference line at value zero; not affected by bar opacity.
    fn draw_zero_line(
        &self,
        ctx: &mut PaintContext<'_>,
        category_axis: &dyn CoordinateAxis,
        value_axis: &dyn CoordinateAxis,
    ) {
        let pen = ctx.style.zero_line_pen;
        let (span_start, span_end) = category_axis.usable_span();
        let zero_y = f64::from(value_axis.value_to_pixel(0.0));
        ctx.frame.push_line(LinePrimitive::new(
            f64::from(span_start),
            zero_y,
            f64::from(span_end),
            zero_y,
            pen.stroke_width(),
            pen.color,
        ));
    }
}

impl ChartContent for BarChartEngine {
    fn draw_content(&self, ctx: &mut PaintContext<'_>) -> Option<Highlight> {
        let (Some(grid), Some(x_axis), Some(y_axis)) = (ctx.grid, ctx.x_axis, ctx.y_axis) else {
            return None;
        };

        self.draw_zero_line(ctx, x_axis, y_axis);

        let slots = self.slot_layout(grid.column_count(), grid.row_count(), x_axis)?;
        debug!(
            mode = ?self.params.mode,
            categories = slots.categories,
            rows = slots.rows,
            slot_width = slots.slot_width,
            bar_thickness = slots.bar_thickness,
            "laying out bar content"
        );

        match self.params.mode {
            ChartMode::Stacked => {
                let layout = project_stacked(grid, y_axis, slots);
                paint_bars(self, ctx, &layout.items)
            }
            ChartMode::Grouped => {
                let items = project_grouped(grid, y_axis, slots);
                paint_bars(self, ctx, &items)
            }
            ChartMode::Trend => {
                let series = project_trend(grid, y_axis, slots);
                paint_trend(self, ctx, &series)
            }
        }
    }

    fn wants_antialias(&self) -> bool {
        self.params.mode == ChartMode::Trend
    }
}

/// Bar chart surface with a category axis along the bottom and a value axis on the left.
pub type BarChart<R> = ChartSurface<R, BarChartEngine>;

impl<R: Renderer> ChartSurface<R, BarChartEngine> {
    /// Creates a bar chart with a category x-axis and a `[value_min, value_max]` y-axis.
    pub fn with_value_range(
        renderer: R,
        viewport: Viewport,
        value_min: f64,
        value_max: f64,
    ) -> ChartResult<Self> {
        let y_axis = LinearAxis::values(Orientation::Vertical, value_min, value_max)?;
        Ok(
            Self::new(renderer, BarChartEngine::default(), viewport).with_axes(
                Some(Box::new(LinearAxis::categories())),
                Some(Box::new(y_axis)),
            ),
        )
    }

    #[must_use]
    pub fn chart_mode(&self) -> ChartMode {
        self.content.mode()
    }

    pub fn set_chart_mode(&mut self, mode: ChartMode) {
        self.content.set_mode(mode);
        self.scheduler.schedule();
    }

    pub fn set_bar_thickness_bounds(&mut self, min_px: i32, max_px: i32) {
        self.content.set_thickness_bounds(min_px, max_px);
        self.scheduler.schedule();
    }

    pub fn set_bar_scale(&mut self, scale: f64) {
        self.content.set_scale(scale);
        self.scheduler.schedule();
    }

    pub fn set_bar_opacity(&mut self, opacity: f64) {
        self.content.set_opacity(opacity);
        self.scheduler.schedule();
    }

    #[must_use]
    pub fn bar_params(&self) -> BarLayoutParams {
        self.content.params()
    }
}

fn row_header(ctx: &PaintContext<'_>, item: &LayoutItem) -> RowHeader {
    ctx.grid
        .map(|grid| grid.row_header(item.cell.row))
        .unwrap_or_default()
}

/// Estimated label box as `(width, height)` in whole pixels.
fn label_size(text: &str, font_size_px: f64) -> PixelPoint {
    PixelPoint::new(
        estimate_text_width_px(text, font_size_px).ceil() as i32,
        (font_size_px * 1.2).ceil() as i32,
    )
}

fn pixel_rect_primitive(rect: PixelRect, fill: Color) -> RectPrimitive {
    RectPrimitive::new(
        f64::from(rect.left),
        f64::from(rect.top),
        f64::from(rect.width),
        f64::from(rect.height),
        fill,
    )
}
