mod bar_chart;
mod bar_painter;
mod chart_style;
mod invalidation;
mod listener_registry;
mod pointer_controller;
mod snapshot;
mod style_controller;
mod surface;
mod value_format;

pub use bar_chart::{BarChart, BarChartEngine, BarLayoutParams, ChartMode};
pub use chart_style::ChartStyle;
pub use invalidation::{RedrawHost, RedrawScheduler};
pub use snapshot::SurfaceSnapshot;
pub use surface::{
    ChartContent, ChartSurface, PaintContext, draw_axes, draw_border, fill_background,
};
pub use value_format::{VALUE_PLACEHOLDER, format_number, format_value};
