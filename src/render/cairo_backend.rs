use cairo::{Antialias, Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::TAU;

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Primitive, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub polylines_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Supports offscreen image-surface rendering through `Renderer::render` and
/// in-place rendering on an external context through `CairoContextRenderer`.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    font_family: String,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            font_family: "Sans".to_owned(),
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        context.set_antialias(if frame.antialias {
            Antialias::Default
        } else {
            Antialias::None
        });

        let mut stats = CairoRenderStats::default();

        for command in &frame.commands {
            match &command.primitive {
                Primitive::Line(line) => {
                    apply_color(context, line.color);
                    context.set_line_width(line.stroke_width);
                    context.move_to(line.x1, line.y1);
                    context.line_to(line.x2, line.y2);
                    context
                        .stroke()
                        .map_err(|err| map_backend_error("failed to stroke line", err))?;
                    stats.lines_drawn += 1;
                }
                Primitive::Rect(rect) => {
                    context.rectangle(rect.x, rect.y, rect.width, rect.height);
                    fill_and_stroke(context, rect.fill_color, rect.border_width, rect.border_color)?;
                    stats.rects_drawn += 1;
                }
                Primitive::Circle(circle) => {
                    context.new_sub_path();
                    context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
                    fill_and_stroke(
                        context,
                        circle.fill_color,
                        circle.border_width,
                        circle.border_color,
                    )?;
                    stats.circles_drawn += 1;
                }
                Primitive::Polyline(polyline) => {
                    let mut points = polyline.points.iter();
                    if let Some((x, y)) = points.next() {
                        context.move_to(*x, *y);
                        for (x, y) in points {
                            context.line_to(*x, *y);
                        }
                        apply_color(context, polyline.color);
                        context.set_line_width(polyline.stroke_width);
                        context
                            .stroke()
                            .map_err(|err| map_backend_error("failed to stroke polyline", err))?;
                        stats.polylines_drawn += 1;
                    }
                }
                Primitive::Text(text) => {
                    let layout = pangocairo::functions::create_layout(context);
                    let font_description = FontDescription::from_string(&format!(
                        "{} {}px",
                        self.font_family, text.font_size_px
                    ));
                    layout.set_font_description(Some(&font_description));
                    layout.set_text(&text.text);

                    let (text_width, _text_height) = layout.pixel_size();
                    let x = match text.h_align {
                        TextHAlign::Left => text.x,
                        TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                        TextHAlign::Right => text.x - f64::from(text_width),
                    };

                    apply_color(context, text.color);
                    context.move_to(x, text.y);
                    pangocairo::functions::show_layout(context, &layout);
                    stats.texts_drawn += 1;
                }
            }
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn fill_and_stroke(
    context: &Context,
    fill: Color,
    border_width: f64,
    border_color: Color,
) -> ChartResult<()> {
    apply_color(context, fill);
    if border_width > 0.0 {
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill shape", err))?;
        apply_color(context, border_color);
        context.set_line_width(border_width);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke shape border", err))
    } else {
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill shape", err))
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
