use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{CellRef, Orientation};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Category of structural or value change published by a `DataGrid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridChangeKind {
    CellChanged,
    HeaderChanged,
    RowsInserted,
    RowsRemoved,
    ColumnsInserted,
    ColumnsRemoved,
}

impl GridChangeKind {
    pub const ALL: [GridChangeKind; 6] = [
        GridChangeKind::CellChanged,
        GridChangeKind::HeaderChanged,
        GridChangeKind::RowsInserted,
        GridChangeKind::RowsRemoved,
        GridChangeKind::ColumnsInserted,
        GridChangeKind::ColumnsRemoved,
    ];
}

/// Change notification delivered to grid subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridChange {
    CellChanged { row: usize, column: usize },
    HeaderChanged { orientation: Orientation },
    RowsInserted { start: usize, count: usize },
    RowsRemoved { start: usize, count: usize },
    ColumnsInserted { start: usize, count: usize },
    ColumnsRemoved { start: usize, count: usize },
}

impl GridChange {
    #[must_use]
    pub const fn kind(self) -> GridChangeKind {
        match self {
            Self::CellChanged { .. } => GridChangeKind::CellChanged,
            Self::HeaderChanged { .. } => GridChangeKind::HeaderChanged,
            Self::RowsInserted { .. } => GridChangeKind::RowsInserted,
            Self::RowsRemoved { .. } => GridChangeKind::RowsRemoved,
            Self::ColumnsInserted { .. } => GridChangeKind::ColumnsInserted,
            Self::ColumnsRemoved { .. } => GridChangeKind::ColumnsRemoved,
        }
    }
}

/// Handle returned by `DataGrid::subscribe`, used to release the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

pub type GridListener = Rc<dyn Fn(GridChange)>;

/// Per-row metadata: legend label plus the colors bars and labels are drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowHeader {
    pub label: String,
    pub foreground: Color,
    pub background: Color,
}

impl Default for RowHeader {
    fn default() -> Self {
        Self {
            label: String::new(),
            foreground: Color::rgb(0.0, 0.0, 0.0),
            background: Color::rgb(0.75, 0.75, 0.75),
        }
    }
}

/// Read-only, change-notifying 2-D numeric table consumed by charts.
///
/// Charts never write back; all mutation happens in the owning application
/// and reaches the chart only through subscriptions.
pub trait DataGrid {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    /// Cell value; absent or out-of-range cells read as `0.0`.
    fn value(&self, cell: CellRef) -> f64;
    fn row_header(&self, row: usize) -> RowHeader;
    fn column_label(&self, column: usize) -> String;
    fn subscribe(&self, kind: GridChangeKind, listener: GridListener) -> SubscriptionId;
    /// Returns `true` when the subscription existed and was released.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Debug, Default)]
struct TableData {
    rows: Vec<Vec<f64>>,
    column_count: usize,
    row_headers: Vec<RowHeader>,
    column_labels: Vec<String>,
}

#[derive(Default)]
struct SubscriberRegistry {
    next_id: Cell<u64>,
    entries: RefCell<IndexMap<SubscriptionId, (GridChangeKind, GridListener)>>,
}

impl SubscriberRegistry {
    fn add(&self, kind: GridChangeKind, listener: GridListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().insert(id, (kind, listener));
        id
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        self.entries.borrow_mut().shift_remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    fn publish(&self, change: GridChange) {
        // Snapshot listeners so a callback may (un)subscribe without a borrow conflict.
        let listeners = self
            .entries
            .borrow()
            .values()
            .filter(|(kind, _)| *kind == change.kind())
            .map(|(_, listener)| Rc::clone(listener))
            .collect::<Vec<_>>();
        trace!(?change, listeners = listeners.len(), "publishing grid change");
        for listener in listeners {
            listener(change);
        }
    }
}

/// In-memory `DataGrid` with interior mutability.
///
/// Share it as `Rc<TableModel>`: the application keeps the strong handle and
/// mutates through `&self`, while charts bind a `Weak` reference.
#[derive(Default)]
pub struct TableModel {
    data: RefCell<TableData>,
    subscribers: SubscriberRegistry,
}

impl std::fmt::Debug for TableModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableModel")
            .field("data", &self.data)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TableModel {
    /// Creates a zero-filled grid.
    #[must_use]
    pub fn new(row_count: usize, column_count: usize) -> Self {
        let model = Self::default();
        {
            let mut data = model.data.borrow_mut();
            data.rows = vec![vec![0.0; column_count]; row_count];
            data.column_count = column_count;
            data.row_headers = vec![RowHeader::default(); row_count];
            data.column_labels = vec![String::new(); column_count];
        }
        model
    }

    /// Builds a grid from row-major values; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> ChartResult<Self> {
        let column_count = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != column_count) {
            return Err(ChartError::InvalidData(
                "all grid rows must have the same column count".to_owned(),
            ));
        }

        let model = Self::new(rows.len(), column_count);
        model.data.borrow_mut().rows = rows;
        Ok(model)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn set_value(&self, cell: CellRef, value: f64) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            let row_count = data.rows.len();
            let column_count = data.column_count;
            let slot = data
                .rows
                .get_mut(cell.row)
                .and_then(|row| row.get_mut(cell.column))
                .ok_or_else(|| {
                    ChartError::InvalidData(format!(
                        "cell ({}, {}) is outside the {}x{} grid",
                        cell.row, cell.column, row_count, column_count
                    ))
                })?;
            *slot = value;
        }
        self.subscribers.publish(GridChange::CellChanged {
            row: cell.row,
            column: cell.column,
        });
        Ok(())
    }

    pub fn set_row_header(&self, row: usize, header: RowHeader) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            let slot = data.row_headers.get_mut(row).ok_or_else(|| {
                ChartError::InvalidData(format!("row {row} is outside the grid"))
            })?;
            *slot = header;
        }
        self.subscribers.publish(GridChange::HeaderChanged {
            orientation: Orientation::Vertical,
        });
        Ok(())
    }

    pub fn set_column_label(&self, column: usize, label: impl Into<String>) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            let slot = data.column_labels.get_mut(column).ok_or_else(|| {
                ChartError::InvalidData(format!("column {column} is outside the grid"))
            })?;
            *slot = label.into();
        }
        self.subscribers.publish(GridChange::HeaderChanged {
            orientation: Orientation::Horizontal,
        });
        Ok(())
    }

    /// Inserts `count` zero-filled rows before `start` (`start == row_count` appends).
    pub fn insert_rows(&self, start: usize, count: usize) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            if start > data.rows.len() {
                return Err(ChartError::InvalidData(format!(
                    "row insert position {start} exceeds row count {}",
                    data.rows.len()
                )));
            }
            let column_count = data.column_count;
            data.rows
                .splice(start..start, (0..count).map(|_| vec![0.0; column_count]));
            data.row_headers
                .splice(start..start, (0..count).map(|_| RowHeader::default()));
        }
        self.subscribers
            .publish(GridChange::RowsInserted { start, count });
        Ok(())
    }

    pub fn remove_rows(&self, start: usize, count: usize) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            let row_count = data.rows.len();
            let end = start
                .checked_add(count)
                .filter(|end| *end <= row_count)
                .ok_or_else(|| {
                    ChartError::InvalidData(format!(
                        "row range {start}+{count} exceeds row count {row_count}"
                    ))
                })?;
            data.rows.drain(start..end);
            data.row_headers.drain(start..end);
        }
        self.subscribers
            .publish(GridChange::RowsRemoved { start, count });
        Ok(())
    }

    /// Inserts `count` zero-filled columns before `start` (`start == column_count` appends).
    pub fn insert_columns(&self, start: usize, count: usize) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            if start > data.column_count {
                return Err(ChartError::InvalidData(format!(
                    "column insert position {start} exceeds column count {}",
                    data.column_count
                )));
            }
            for row in &mut data.rows {
                row.splice(start..start, std::iter::repeat_n(0.0, count));
            }
            data.column_labels
                .splice(start..start, std::iter::repeat_n(String::new(), count));
            data.column_count += count;
        }
        self.subscribers
            .publish(GridChange::ColumnsInserted { start, count });
        Ok(())
    }

    pub fn remove_columns(&self, start: usize, count: usize) -> ChartResult<()> {
        {
            let mut data = self.data.borrow_mut();
            let column_count = data.column_count;
            let end = start
                .checked_add(count)
                .filter(|end| *end <= column_count)
                .ok_or_else(|| {
                    ChartError::InvalidData(format!(
                        "column range {start}+{count} exceeds column count {column_count}"
                    ))
                })?;
            for row in &mut data.rows {
                row.drain(start..end);
            }
            data.column_labels.drain(start..end);
            data.column_count -= count;
        }
        self.subscribers
            .publish(GridChange::ColumnsRemoved { start, count });
        Ok(())
    }
}

impl DataGrid for TableModel {
    fn row_count(&self) -> usize {
        self.data.borrow().rows.len()
    }

    fn column_count(&self) -> usize {
        self.data.borrow().column_count
    }

    fn value(&self, cell: CellRef) -> f64 {
        self.data
            .borrow()
            .rows
            .get(cell.row)
            .and_then(|row| row.get(cell.column))
            .copied()
            .unwrap_or(0.0)
    }

    fn row_header(&self, row: usize) -> RowHeader {
        self.data
            .borrow()
            .row_headers
            .get(row)
            .cloned()
            .unwrap_or_default()
    }

    fn column_label(&self, column: usize) -> String {
        self.data
            .borrow()
            .column_labels
            .get(column)
            .cloned()
            .unwrap_or_default()
    }

    fn subscribe(&self, kind: GridChangeKind, listener: GridListener) -> SubscriptionId {
        self.subscribers.add(kind, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }
}
