pub mod axis;
pub mod bar_layout;
pub mod data_grid;
pub mod scale;
pub mod types;

pub use axis::{AxisDomain, AxisStyle, CoordinateAxis, LinearAxis};
pub use bar_layout::{
    LayoutItem, SlotLayout, StackTotals, StackedLayout, TREND_HIT_RADIUS_PX, TrendSeries,
    grouped_bar_width, project_grouped, project_stacked, project_trend, resolve_bar_thickness,
    slot_width,
};
pub use data_grid::{
    DataGrid, GridChange, GridChangeKind, GridListener, RowHeader, SubscriptionId, TableModel,
};
pub use scale::{LinearScale, PIXEL_OVERSHOOT};
pub use types::{CellRef, Orientation, PixelPoint, PixelRect, Viewport};
