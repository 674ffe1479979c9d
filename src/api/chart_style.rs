use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Pen};

/// Flat style bag shared by the paint pipeline and bar drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub border_pen: Pen,
    pub background: Color,
    pub item_pen: Pen,
    pub font_size_px: f64,
    pub highlight_text_color: Color,
    pub highlight_pen: Pen,
    pub highlight_brush: Color,
    /// Alpha multiplier applied to `highlight_brush`.
    pub highlight_alpha: f64,
    /// Value label template; `%1` is replaced by the value. Empty means plain number.
    pub text_format: String,
    pub zero_line_pen: Pen,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            border_pen: Pen::solid(Color::rgb(0.627, 0.627, 0.643)),
            background: Color::rgb(0.753, 0.753, 0.753),
            item_pen: Pen::solid(Color::rgb(0.5, 0.5, 0.5)),
            font_size_px: 11.0,
            highlight_text_color: Color::rgb(1.0, 1.0, 1.0),
            highlight_pen: Pen::solid(Color::rgb(0.0, 0.0, 0.0)),
            highlight_brush: Color::rgb(0.627, 0.627, 0.643),
            highlight_alpha: 0.5,
            text_format: String::new(),
            zero_line_pen: Pen::solid(Color::rgb(1.0, 1.0, 1.0)),
        }
    }
}

impl ChartStyle {
    pub fn validate(&self) -> ChartResult<()> {
        for pen in [
            self.border_pen,
            self.item_pen,
            self.highlight_pen,
            self.zero_line_pen,
        ] {
            pen.validate()?;
        }
        for color in [
            self.background,
            self.highlight_text_color,
            self.highlight_brush,
        ] {
            color.validate()?;
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.highlight_alpha) {
            return Err(ChartError::InvalidData(
                "highlight alpha must be in [0, 1]".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Clamps a ratio into `[0, 1]`; NaN maps to `0`.
#[must_use]
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value >= 0.0 { value.min(1.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::{ChartStyle, clamp_unit};

    #[test]
    fn default_style_is_valid() {
        assert!(ChartStyle::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_alpha_and_font() {
        let mut style = ChartStyle {
            highlight_alpha: 1.5,
            ..ChartStyle::default()
        };
        assert!(style.validate().is_err());
        style.highlight_alpha = 0.2;
        style.font_size_px = 0.0;
        assert!(style.validate().is_err());
    }

    #[test]
    fn clamp_unit_handles_nan_and_bounds() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(-2.0), 0.0);
        assert_eq!(clamp_unit(4.0), 1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
