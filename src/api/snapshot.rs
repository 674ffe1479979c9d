use serde::{Deserialize, Serialize};

use crate::core::{
    CellRef, LayoutItem, PixelPoint, PixelRect, Viewport, project_grouped, project_stacked,
    project_trend,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::Highlight;
use crate::render::Renderer;

use super::{BarChartEngine, BarLayoutParams, ChartMode, ChartStyle, ChartSurface};

/// Serializable deterministic state of a bar chart, for regression tests and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSnapshot {
    pub viewport: Viewport,
    pub drawable: PixelRect,
    pub params: BarLayoutParams,
    pub style: ChartStyle,
    pub pointer: Option<PixelPoint>,
    pub hovered: Option<Highlight>,
    pub pressed: Option<Option<CellRef>>,
    pub row_count: usize,
    pub column_count: usize,
    pub items: Vec<LayoutItem>,
    pub layout_passes: u64,
}

impl<R: Renderer> ChartSurface<R, BarChartEngine> {
    /// Captures the current configuration plus the items the next paint would lay out.
    ///
    /// Geometry uses the axis areas assigned by the last paint pass.
    #[must_use]
    pub fn snapshot(&self) -> SurfaceSnapshot {
        let grid = self.model();
        let (row_count, column_count) = grid
            .as_deref()
            .map_or((0, 0), |grid| (grid.row_count(), grid.column_count()));

        let items = match (grid.as_deref(), self.x_axis.as_deref(), self.y_axis.as_deref()) {
            (Some(grid), Some(x_axis), Some(y_axis)) => self
                .content
                .slot_layout(column_count, row_count, x_axis)
                .map(|slots| match self.content.mode() {
                    ChartMode::Stacked => project_stacked(grid, y_axis, slots).items,
                    ChartMode::Grouped => project_grouped(grid, y_axis, slots),
                    ChartMode::Trend => project_trend(grid, y_axis, slots)
                        .into_iter()
                        .flat_map(|series| series.points)
                        .collect(),
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };

        SurfaceSnapshot {
            viewport: self.viewport,
            drawable: self.drawable_rect(),
            params: self.content.params(),
            style: self.style.clone(),
            pointer: self.pointer.position(),
            hovered: self.pointer.hovered(),
            pressed: self.pointer.pressed_cell(),
            row_count,
            column_count,
            items,
            layout_passes: self.layout_passes,
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
