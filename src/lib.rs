//! gridchart-rs: bar/trend chart engine over tabular data.
//!
//! A `ChartSurface` binds a read-only `DataGrid`, lays it out through two
//! coordinate axes, and materializes a deterministic `RenderFrame` for any
//! `Renderer` backend. Pointer input is resolved to the data cell under the
//! cursor once per paint pass.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{BarChart, BarChartEngine, ChartMode, ChartStyle, ChartSurface};
pub use error::{ChartError, ChartResult};
