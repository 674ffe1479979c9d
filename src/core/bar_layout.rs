use serde::{Deserialize, Serialize};

use crate::core::{CellRef, CoordinateAxis, DataGrid, PixelPoint, PixelRect};

/// Half-size of the square used to hit-test trend points.
pub const TREND_HIT_RADIUS_PX: i32 = 3;

/// Horizontal partition shared by every layout projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLayout {
    pub categories: usize,
    pub rows: usize,
    pub span_start: i32,
    pub slot_width: i32,
    pub bar_thickness: i32,
}

impl SlotLayout {
    /// Left edge of the bar block centered inside category slot `category`.
    #[must_use]
    pub fn bar_left(self, category: usize) -> i32 {
        self.slot_left(category) + (self.slot_width - self.bar_thickness) / 2
    }

    #[must_use]
    pub fn slot_left(self, category: usize) -> i32 {
        self.span_start + self.slot_width * to_i32(category)
    }

    #[must_use]
    pub fn slot_center(self, category: usize) -> i32 {
        self.slot_left(category) + self.slot_width / 2
    }
}

/// One projected data cell: drawn geometry plus the area that reacts to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub cell: CellRef,
    pub value: f64,
    pub rect: PixelRect,
    pub hit_rect: PixelRect,
}

impl LayoutItem {
    #[must_use]
    pub fn bar(cell: CellRef, value: f64, rect: PixelRect) -> Self {
        Self {
            cell,
            value,
            rect,
            hit_rect: rect,
        }
    }

    #[must_use]
    pub fn point(cell: CellRef, value: f64, at: PixelPoint) -> Self {
        let side = 2 * TREND_HIT_RADIUS_PX + 1;
        Self {
            cell,
            value,
            rect: PixelRect::new(at.x, at.y, 1, 1),
            hit_rect: PixelRect::new(
                at.x.saturating_sub(TREND_HIT_RADIUS_PX),
                at.y.saturating_sub(TREND_HIT_RADIUS_PX),
                side,
                side,
            ),
        }
    }

    #[must_use]
    pub fn hit(&self, pointer: Option<PixelPoint>) -> bool {
        pointer.is_some_and(|pointer| self.hit_rect.contains(pointer))
    }
}

/// Running stack sums for one category after all rows were accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StackTotals {
    pub positive: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackedLayout {
    pub items: Vec<LayoutItem>,
    pub totals: Vec<StackTotals>,
}

/// One trend polyline: a point per category for `row`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub row: usize,
    pub points: Vec<LayoutItem>,
}

/// Equal-width category slot for `column_count` columns, truncated to whole pixels.
#[must_use]
pub fn slot_width(span_start: i32, span_end: i32, column_count: usize) -> i32 {
    if column_count == 0 {
        return 0;
    }
    (f64::from(span_end - span_start) / column_count as f64) as i32
}

/// Applies the scale factor to the slot width and clamps with the advisory bounds.
///
/// A bound only ever narrows the bar down to the slot width; it never widens a
/// bar past its slot.
#[must_use]
pub fn resolve_bar_thickness(slot_width: i32, scale: f64, min_px: i32, max_px: i32) -> i32 {
    let candidate = (f64::from(slot_width) * scale) as i32;
    if candidate > max_px {
        max_px.min(slot_width)
    } else if candidate < min_px {
        min_px.min(slot_width)
    } else {
        candidate
    }
}

/// Stacks rows per category: non-negative values grow up from zero, negative values down.
#[must_use]
pub fn project_stacked(
    grid: &dyn DataGrid,
    value_axis: &dyn CoordinateAxis,
    slots: SlotLayout,
) -> StackedLayout {
    let zero_y = value_axis.value_to_pixel(0.0);
    let mut layout = StackedLayout {
        items: Vec::with_capacity(slots.categories * slots.rows),
        totals: Vec::with_capacity(slots.categories),
    };

    for column in 0..slots.categories {
        let left = slots.bar_left(column);
        let mut totals = StackTotals::default();
        let mut positive_y = zero_y;
        let mut negative_y = zero_y;

        for row in 0..slots.rows {
            let cell = CellRef::new(row, column);
            let value = cell_value(grid, cell);
            let rect = if value < 0.0 {
                totals.negative += value;
                let next_y = value_axis.value_to_pixel(totals.negative);
                let rect = PixelRect::new(
                    left,
                    negative_y,
                    slots.bar_thickness,
                    next_y.saturating_sub(negative_y),
                );
                negative_y = next_y;
                rect
            } else {
                totals.positive += value;
                let next_y = value_axis.value_to_pixel(totals.positive);
                let rect = PixelRect::new(
                    left,
                    next_y,
                    slots.bar_thickness,
                    positive_y.saturating_sub(next_y),
                );
                positive_y = next_y;
                rect
            };
            layout.items.push(LayoutItem::bar(cell, value, rect));
        }

        layout.totals.push(totals);
    }

    layout
}

/// Places each row's bar side by side inside the category block.
///
/// Returns no items when the block is narrower than one pixel per row.
#[must_use]
pub fn project_grouped(
    grid: &dyn DataGrid,
    value_axis: &dyn CoordinateAxis,
    slots: SlotLayout,
) -> Vec<LayoutItem> {
    let single = grouped_bar_width(slots);
    if single == 0 {
        return Vec::new();
    }

    let zero_y = value_axis.value_to_pixel(0.0);
    let mut items = Vec::with_capacity(slots.categories * slots.rows);
    for column in 0..slots.categories {
        let mut left = slots.bar_left(column);
        for row in 0..slots.rows {
            let cell = CellRef::new(row, column);
            let value = cell_value(grid, cell);
            let value_y = value_axis.value_to_pixel(value);
            let rect = if value < 0.0 {
                PixelRect::new(left, zero_y, single, value_y.saturating_sub(zero_y))
            } else {
                PixelRect::new(left, value_y, single, zero_y.saturating_sub(value_y))
            };
            items.push(LayoutItem::bar(cell, value, rect));
            left += single;
        }
    }
    items
}

/// Width of one grouped sub-bar (integer division of the block by the row count).
#[must_use]
pub fn grouped_bar_width(slots: SlotLayout) -> i32 {
    match i32::try_from(slots.rows) {
        Ok(rows) if rows > 0 => slots.bar_thickness / rows,
        _ => 0,
    }
}

/// One point per category at the slot center, one series per row.
#[must_use]
pub fn project_trend(
    grid: &dyn DataGrid,
    value_axis: &dyn CoordinateAxis,
    slots: SlotLayout,
) -> Vec<TrendSeries> {
    (0..slots.rows)
        .map(|row| TrendSeries {
            row,
            points: (0..slots.categories)
                .map(|column| {
                    let cell = CellRef::new(row, column);
                    let value = cell_value(grid, cell);
                    let at = PixelPoint::new(
                        slots.slot_center(column),
                        value_axis.value_to_pixel(value),
                    );
                    LayoutItem::point(cell, value, at)
                })
                .collect(),
        })
        .collect()
}

fn cell_value(grid: &dyn DataGrid, cell: CellRef) -> f64 {
    let value = grid.value(cell);
    if value.is_finite() { value } else { 0.0 }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
