use serde::{Deserialize, Serialize};

/// Widget area in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Full widget bounds as a pixel rectangle anchored at the origin.
    #[must_use]
    pub fn bounds(self) -> PixelRect {
        PixelRect::new(
            0,
            0,
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

/// Integer pointer/geometry coordinate in widget space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned integer rectangle.
///
/// Width and height are never negative: constructors normalize spans given
/// in either direction. Containment is half-open on the right/bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[must_use]
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        let (left, width) = if width < 0 {
            (left.saturating_add(width), width.saturating_neg())
        } else {
            (left, width)
        };
        let (top, height) = if height < 0 {
            (top.saturating_add(height), height.saturating_neg())
        } else {
            (top, height)
        };
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Builds the rectangle spanning two vertical pixel positions.
    #[must_use]
    pub fn from_vertical_span(left: i32, width: i32, y_a: i32, y_b: i32) -> Self {
        let height = i32::try_from(y_b.abs_diff(y_a)).unwrap_or(i32::MAX);
        Self::new(left, y_a.min(y_b), width, height)
    }

    #[must_use]
    pub const fn right(self) -> i32 {
        self.left.saturating_add(self.width)
    }

    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.top.saturating_add(self.height)
    }

    #[must_use]
    pub const fn top_left(self) -> PixelPoint {
        PixelPoint::new(self.left, self.top)
    }

    #[must_use]
    pub const fn center(self) -> PixelPoint {
        PixelPoint::new(
            self.left.saturating_add(self.width / 2),
            self.top.saturating_add(self.height / 2),
        )
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[must_use]
    pub const fn contains(self, point: PixelPoint) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Grows (positive) or shrinks (negative) the rectangle on every side.
    #[must_use]
    pub fn inflated(self, margin: i32) -> Self {
        Self::new(
            self.left.saturating_sub(margin),
            self.top.saturating_sub(margin),
            self.width.saturating_add(margin.saturating_mul(2)).max(0),
            self.height.saturating_add(margin.saturating_mul(2)).max(0),
        )
    }

    /// Re-centers a rectangle of the same size on `center`.
    #[must_use]
    pub fn centered_on(self, center: PixelPoint) -> Self {
        Self::new(
            center.x.saturating_sub(self.width / 2),
            center.y.saturating_sub(self.height / 2),
            self.width,
            self.height,
        )
    }
}

/// Address of one data cell; `Option<CellRef>::None` means "no cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
}

impl CellRef {
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}
