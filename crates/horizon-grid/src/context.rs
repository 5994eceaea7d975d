//! Per-grid shared state injected into every cell.
//!
//! A [`GridContext`] bundles what all cells of one grid share: the broadcast
//! channel, the value matrix, the host callbacks, the table style and the
//! date formatter. Each grid owns its own context, so two grids on screen
//! never see each other's broadcasts.

use std::fmt;
use std::sync::Arc;

use horizon_grid_core::Broadcaster;

use crate::cell::Cell;
use crate::column::ColumnConfig;
use crate::date::{ChronoDateFormatter, DateFormatter};
use crate::events::{CellCoord, GridEvent, GridTopic, PressEvent, RowScope};
use crate::gesture::LongPressRecognizer;
use crate::matrix::SharedMatrix;
use crate::style::{CellStyleOverrides, TableStyle};
use crate::value::CellValue;

/// The broadcast channel type used by a grid.
pub type GridBroadcaster = Broadcaster<GridTopic, GridEvent>;

/// Callback invoked with the triggering press and the pressed cell's value.
pub type CellPressHandler = Arc<dyn Fn(&PressEvent, &CellValue) + Send + Sync>;

/// Callback invoked with the triggering press and every value in its scope.
pub type RowPressHandler = Arc<dyn Fn(&PressEvent, &[CellValue]) + Send + Sync>;

/// Optional host callbacks fired by the cell a long-press lands on.
#[derive(Clone, Default)]
pub struct GridCallbacks {
    pub on_cell_press: Option<CellPressHandler>,
    pub on_row_press: Option<RowPressHandler>,
}

impl fmt::Debug for GridCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCallbacks")
            .field("on_cell_press", &self.on_cell_press.is_some())
            .field("on_row_press", &self.on_row_press.is_some())
            .finish()
    }
}

/// State shared by every cell of one grid.
///
/// Cloning is cheap; all clones refer to the same channel and matrix.
///
/// # Example
///
/// ```
/// use horizon_grid::{CellValue, ColumnConfig, GridContext, SharedMatrix};
///
/// let matrix = SharedMatrix::from_lines(vec![vec![1, 2], vec![3, 4]]);
/// let context = GridContext::new(matrix)
///     .on_row_press(|_event, values| println!("pressed row: {:?}", values));
///
/// let cell = context.mount_cell(ColumnConfig::number(), 1, 0);
/// assert_eq!(cell.content().display_text(), "3");
/// ```
#[derive(Clone)]
pub struct GridContext {
    broadcaster: Arc<GridBroadcaster>,
    matrix: SharedMatrix,
    callbacks: GridCallbacks,
    style: Arc<TableStyle>,
    dates: Arc<dyn DateFormatter>,
}

impl GridContext {
    /// Create a context for `matrix` with default style and date formatting.
    pub fn new(matrix: SharedMatrix) -> Self {
        Self {
            broadcaster: Arc::new(GridBroadcaster::new()),
            matrix,
            callbacks: GridCallbacks::default(),
            style: Arc::new(TableStyle::default()),
            dates: Arc::new(ChronoDateFormatter::new()),
        }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = Arc::new(style);
        self
    }

    /// Replaces the date formatter.
    pub fn with_date_formatter<D>(mut self, formatter: D) -> Self
    where
        D: DateFormatter + 'static,
    {
        self.dates = Arc::new(formatter);
        self
    }

    /// Sets all callbacks at once.
    pub fn with_callbacks(mut self, callbacks: GridCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Sets the cell-press callback.
    pub fn on_cell_press<F>(mut self, f: F) -> Self
    where
        F: Fn(&PressEvent, &CellValue) + Send + Sync + 'static,
    {
        self.callbacks.on_cell_press = Some(Arc::new(f));
        self
    }

    /// Sets the row-press callback.
    pub fn on_row_press<F>(mut self, f: F) -> Self
    where
        F: Fn(&PressEvent, &[CellValue]) + Send + Sync + 'static,
    {
        self.callbacks.on_row_press = Some(Arc::new(f));
        self
    }

    /// The grid's broadcast channel.
    pub fn broadcaster(&self) -> &Arc<GridBroadcaster> {
        &self.broadcaster
    }

    /// The shared matrix.
    pub fn matrix(&self) -> &SharedMatrix {
        &self.matrix
    }

    /// The host callbacks.
    pub fn callbacks(&self) -> &GridCallbacks {
        &self.callbacks
    }

    /// The table style.
    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    /// The date formatter.
    pub fn date_formatter(&self) -> &dyn DateFormatter {
        self.dates.as_ref()
    }

    /// A long-press recognizer using the table's long-press delay.
    pub fn long_press_recognizer(&self) -> LongPressRecognizer {
        LongPressRecognizer::with_delay(self.style.long_press_delay)
    }

    /// Mount a cell with no per-cell style overrides.
    pub fn mount_cell(&self, column: ColumnConfig, parent_index: usize, own_index: usize) -> Cell {
        Cell::mount(self, column, parent_index, own_index, CellStyleOverrides::default())
    }

    /// Ask the cell at `coord` to re-read its value from the matrix.
    ///
    /// Returns the number of cells that received the request.
    pub fn force_update(&self, coord: CellCoord) -> usize {
        self.broadcaster
            .publish(&GridTopic::CellUpdate(coord), GridEvent::ForceUpdate)
    }

    /// Write one value into the matrix and push it to the cell showing it.
    ///
    /// Returns `true` if the matrix value changed.
    pub fn update_cell(&self, coord: CellCoord, value: CellValue) -> bool {
        let changed = self.matrix.set(coord.parent_index, coord.own_index, value);
        if changed {
            self.force_update(coord);
        }
        changed
    }

    /// Release every pressed cell in `scope`.
    pub fn release_scope(&self, scope: RowScope) -> usize {
        self.broadcaster
            .publish(&GridTopic::RowPressOut(scope), GridEvent::PressOut)
    }
}

impl fmt::Debug for GridContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridContext")
            .field("broadcaster", &self.broadcaster)
            .field("matrix", &self.matrix)
            .field("callbacks", &self.callbacks)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}
