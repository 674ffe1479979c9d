use crate::error::{ChartError, ChartResult};

/// How far past either end of the pixel span a projected value may land.
pub const PIXEL_OVERSHOOT: i32 = i16::MAX as i32;

/// Affine map between a numeric domain and a pixel span.
///
/// The pixel span may run in either direction; value axes map their minimum
/// to the bottom edge, so `pixel_start > pixel_end` there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Projects `value` onto `[pixel_start, pixel_end]`, rounding to the nearest pixel.
    ///
    /// Non-finite values collapse onto `pixel_start`. Values outside the domain
    /// are clamped to [`PIXEL_OVERSHOOT`] pixels beyond the span.
    #[must_use]
    pub fn domain_to_pixel(self, value: f64, pixel_start: i32, pixel_end: i32) -> i32 {
        if !value.is_finite() {
            return pixel_start;
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        let pixel_span = f64::from(pixel_end) - f64::from(pixel_start);
        let pixel = f64::from(pixel_start) + normalized * pixel_span;
        let low = f64::from(pixel_start.min(pixel_end)) - f64::from(PIXEL_OVERSHOOT);
        let high = f64::from(pixel_start.max(pixel_end)) + f64::from(PIXEL_OVERSHOOT);
        saturate_to_i32(pixel.round().clamp(low, high))
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: i32, pixel_start: i32, pixel_end: i32) -> f64 {
        if pixel_start == pixel_end {
            return self.domain_start;
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (f64::from(pixel) - f64::from(pixel_start))
            / (f64::from(pixel_end) - f64::from(pixel_start));
        self.domain_start + normalized * span
    }
}

fn saturate_to_i32(value: f64) -> i32 {
    if value >= f64::from(i32::MAX) {
        i32::MAX
    } else if value <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        value as i32
    }
}

#[cfg(test)]
mod tests {
    use super::LinearScale;

    #[test]
    fn rejects_degenerate_domain() {
        assert!(LinearScale::new(5.0, 5.0).is_err());
        assert!(LinearScale::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn maps_into_reversed_pixel_span() {
        let scale = LinearScale::new(-100.0, 100.0).expect("scale");
        assert_eq!(scale.domain_to_pixel(-100.0, 200, 0), 200);
        assert_eq!(scale.domain_to_pixel(0.0, 200, 0), 100);
        assert_eq!(scale.domain_to_pixel(100.0, 200, 0), 0);
        assert!((scale.pixel_to_domain(50, 200, 0) - 50.0).abs() <= 1e-9);
    }

    #[test]
    fn out_of_domain_values_clamp_near_the_span() {
        let scale = LinearScale::new(-10.0, 10.0).expect("scale");
        assert_eq!(
            scale.domain_to_pixel(1e12, 280, 0),
            -super::PIXEL_OVERSHOOT
        );
        assert_eq!(
            scale.domain_to_pixel(-1e12, 280, 0),
            280 + super::PIXEL_OVERSHOOT
        );
    }

    #[test]
    fn non_finite_value_collapses_to_span_start() {
        let scale = LinearScale::new(0.0, 10.0).expect("scale");
        assert_eq!(scale.domain_to_pixel(f64::INFINITY, 40, 400), 40);
    }
}
