use serde::{Deserialize, Serialize};

use crate::core::{DataGrid, LinearScale, Orientation, PixelRect};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LinePrimitive, Pen, RenderFrame, TextHAlign, TextPrimitive};

/// Coordinate transform plus self-drawn decorations for one chart direction.
///
/// The surface assigns the drawable area before every paint; afterwards
/// `value_to_pixel` maps into that area and `draw` paints ticks, grid lines,
/// and labels, using `reserved_span` pixels outside it for labels.
pub trait CoordinateAxis {
    fn orientation(&self) -> Orientation;
    /// Pixels reserved outside the drawable rect for ticks and labels.
    fn reserved_span(&self) -> i32;
    /// Refreshes model-derived state (category count and labels).
    fn sync_model(&mut self, grid: Option<&dyn DataGrid>);
    fn set_area(&mut self, area: PixelRect);
    /// Usable pixel span along the axis direction as `(start, end)`.
    fn usable_span(&self) -> (i32, i32);
    fn value_to_pixel(&self, value: f64) -> i32;
    fn pixel_to_value(&self, pixel: i32) -> f64;
    fn draw(&self, frame: &mut RenderFrame);
}

/// What the axis spans: model columns or an explicit numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisDomain {
    Categories,
    Range { min: f64, max: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    pub line_pen: Pen,
    pub minor_tick_pen: Pen,
    pub major_tick_pen: Pen,
    pub minor_grid_pen: Option<Pen>,
    pub major_grid_pen: Option<Pen>,
    pub text_color: Color,
    pub font_size_px: f64,
    pub minor_tick_length_px: i32,
    pub major_tick_length_px: i32,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            line_pen: Pen::solid(Color::rgb(0.33, 0.33, 0.33)),
            minor_tick_pen: Pen::solid(Color::rgb(0.5, 0.5, 0.5)),
            major_tick_pen: Pen::solid(Color::rgb(0.33, 0.33, 0.33)),
            minor_grid_pen: None,
            major_grid_pen: Some(Pen::solid(Color::rgb(0.83, 0.83, 0.83))),
            text_color: Color::rgb(0.0, 0.0, 0.0),
            font_size_px: 11.0,
            minor_tick_length_px: 2,
            major_tick_length_px: 5,
        }
    }
}

/// Linear axis over model categories or a fixed numeric range.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearAxis {
    orientation: Orientation,
    domain: AxisDomain,
    reserved_span: i32,
    minor_step: f64,
    major_step: f64,
    style: AxisStyle,
    area: PixelRect,
    category_labels: Vec<String>,
}

impl LinearAxis {
    /// Horizontal axis with one slot per model column.
    #[must_use]
    pub fn categories() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            domain: AxisDomain::Categories,
            reserved_span: 20,
            minor_step: 0.0,
            major_step: 1.0,
            style: AxisStyle::default(),
            area: PixelRect::new(0, 0, 0, 0),
            category_labels: Vec::new(),
        }
    }

    /// Value axis over `[min, max]`.
    pub fn values(orientation: Orientation, min: f64, max: f64) -> ChartResult<Self> {
        LinearScale::new(min, max)?;
        Ok(Self {
            orientation,
            domain: AxisDomain::Range { min, max },
            reserved_span: 40,
            minor_step: 0.0,
            major_step: (max - min).abs() / 10.0,
            style: AxisStyle::default(),
            area: PixelRect::new(0, 0, 0, 0),
            category_labels: Vec::new(),
        })
    }

    #[must_use]
    pub fn domain(&self) -> AxisDomain {
        self.domain
    }

    pub fn set_ranges(&mut self, min: f64, max: f64) -> ChartResult<()> {
        LinearScale::new(min, max)?;
        self.domain = AxisDomain::Range { min, max };
        Ok(())
    }

    /// Sets minor and major tick steps in domain units; `0` disables that tick class.
    pub fn set_ticks(&mut self, minor_step: f64, major_step: f64) -> ChartResult<()> {
        for (name, step) in [("minor", minor_step), ("major", major_step)] {
            if !step.is_finite() || step < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} tick step must be finite and >= 0"
                )));
            }
        }
        self.minor_step = minor_step;
        self.major_step = major_step;
        Ok(())
    }

    pub fn set_reserved_span(&mut self, span_px: i32) {
        self.reserved_span = span_px.max(0);
    }

    #[must_use]
    pub fn style(&self) -> AxisStyle {
        self.style
    }

    pub fn set_style(&mut self, style: AxisStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.category_labels.len()
    }

    fn scale(&self) -> Option<LinearScale> {
        match self.domain {
            AxisDomain::Categories => LinearScale::new(0.0, self.category_labels.len() as f64).ok(),
            AxisDomain::Range { min, max } => LinearScale::new(min, max).ok(),
        }
    }

    /// Pixel span oriented in increasing-value direction.
    fn directed_span(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.area.left, self.area.right()),
            Orientation::Vertical => (self.area.bottom(), self.area.top),
        }
    }

    fn tick_values(&self, step: f64) -> Vec<f64> {
        let AxisDomain::Range { min, max } = self.domain else {
            return Vec::new();
        };
        if step <= 0.0 {
            return Vec::new();
        }
        let (low, high) = (min.min(max), min.max(max));
        if (high - low) / step > 10_000.0 {
            return Vec::new();
        }

        let first = (low / step).ceil() as i64;
        let last = (high / step + 1e-9).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }

    fn draw_range_ticks(&self, frame: &mut RenderFrame) {
        let area = self.area;
        for value in self.tick_values(self.minor_step) {
            let pixel = self.value_to_pixel(value);
            self.push_tick(frame, pixel, self.style.minor_tick_length_px, self.style.minor_tick_pen);
            if let Some(pen) = self.style.minor_grid_pen {
                self.push_grid_line(frame, pixel, pen);
            }
        }

        for value in self.tick_values(self.major_step) {
            let pixel = self.value_to_pixel(value);
            if let Some(pen) = self.style.major_grid_pen {
                self.push_grid_line(frame, pixel, pen);
            }
            self.push_tick(frame, pixel, self.style.major_tick_length_px, self.style.major_tick_pen);

            let text = format_tick_label(value);
            let font = self.style.font_size_px;
            let label = match self.orientation {
                Orientation::Vertical => TextPrimitive::new(
                    text,
                    f64::from(area.left - self.style.major_tick_length_px - 2),
                    f64::from(pixel) - font / 2.0,
                    font,
                    self.style.text_color,
                    TextHAlign::Right,
                ),
                Orientation::Horizontal => TextPrimitive::new(
                    text,
                    f64::from(pixel),
                    f64::from(area.bottom() + self.style.major_tick_length_px + 1),
                    font,
                    self.style.text_color,
                    TextHAlign::Center,
                ),
            };
            frame.push_text(label);
        }
    }

    fn draw_category_ticks(&self, frame: &mut RenderFrame) {
        let count = self.category_labels.len();
        if count == 0 {
            return;
        }
        let (start, end) = self.usable_span();
        let slot = f64::from(end - start) / count as f64;

        for boundary in 0..=count {
            let pixel = start + (slot * boundary as f64) as i32;
            if let Some(pen) = self.style.major_grid_pen {
                self.push_grid_line(frame, pixel, pen);
            }
            self.push_tick(frame, pixel, self.style.major_tick_length_px, self.style.major_tick_pen);
        }

        for (column, label) in self.category_labels.iter().enumerate() {
            if label.is_empty() {
                continue;
            }
            let center = f64::from(start) + slot * (column as f64 + 0.5);
            frame.push_text(TextPrimitive::new(
                label.clone(),
                center,
                f64::from(self.area.bottom() + self.style.major_tick_length_px + 1),
                self.style.font_size_px,
                self.style.text_color,
                TextHAlign::Center,
            ));
        }
    }

    fn push_tick(&self, frame: &mut RenderFrame, pixel: i32, length: i32, pen: Pen) {
        let area = self.area;
        let (x1, y1, x2, y2) = match self.orientation {
            Orientation::Vertical => (area.left - length, pixel, area.left, pixel),
            Orientation::Horizontal => (pixel, area.bottom(), pixel, area.bottom() + length),
        };
        push_pen_line(frame, pen, x1, y1, x2, y2);
    }

    fn push_grid_line(&self, frame: &mut RenderFrame, pixel: i32, pen: Pen) {
        let area = self.area;
        let (x1, y1, x2, y2) = match self.orientation {
            Orientation::Vertical => (area.left, pixel, area.right(), pixel),
            Orientation::Horizontal => (pixel, area.top, pixel, area.bottom()),
        };
        push_pen_line(frame, pen, x1, y1, x2, y2);
    }
}

impl CoordinateAxis for LinearAxis {
    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn reserved_span(&self) -> i32 {
        self.reserved_span
    }

    fn sync_model(&mut self, grid: Option<&dyn DataGrid>) {
        self.category_labels = match (self.domain, grid) {
            (AxisDomain::Categories, Some(grid)) => (0..grid.column_count())
                .map(|column| grid.column_label(column))
                .collect(),
            _ => Vec::new(),
        };
    }

    fn set_area(&mut self, area: PixelRect) {
        self.area = area;
    }

    fn usable_span(&self) -> (i32, i32) {
        match self.orientation {
            Orientation::Horizontal => (self.area.left, self.area.right()),
            Orientation::Vertical => (self.area.top, self.area.bottom()),
        }
    }

    fn value_to_pixel(&self, value: f64) -> i32 {
        let (start, end) = self.directed_span();
        self.scale()
            .map_or(start, |scale| scale.domain_to_pixel(value, start, end))
    }

    fn pixel_to_value(&self, pixel: i32) -> f64 {
        let (start, end) = self.directed_span();
        self.scale()
            .map_or(0.0, |scale| scale.pixel_to_domain(pixel, start, end))
    }

    fn draw(&self, frame: &mut RenderFrame) {
        if self.area.is_empty() {
            return;
        }

        match self.domain {
            AxisDomain::Categories => self.draw_category_ticks(frame),
            AxisDomain::Range { .. } => self.draw_range_ticks(frame),
        }

        let area = self.area;
        match self.orientation {
            Orientation::Vertical => push_pen_line(
                frame,
                self.style.line_pen,
                area.left,
                area.top,
                area.left,
                area.bottom(),
            ),
            Orientation::Horizontal => push_pen_line(
                frame,
                self.style.line_pen,
                area.left,
                area.bottom(),
                area.right(),
                area.bottom(),
            ),
        }
    }
}

fn push_pen_line(frame: &mut RenderFrame, pen: Pen, x1: i32, y1: i32, x2: i32, y2: i32) {
    frame.push_line(LinePrimitive::new(
        f64::from(x1),
        f64::from(y1),
        f64::from(x2),
        f64::from(y2),
        pen.stroke_width(),
        pen.color,
    ));
}

fn format_tick_label(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded}")
    }
}
