//! The mountable grid cell.
//!
//! A [`Cell`] shows one value of the shared matrix and takes part in
//! scope-wide press highlighting. It subscribes to three topics while
//! mounted:
//!
//! - `RowPressIn(scope)`: become pressed
//! - `RowPressOut(scope)`: become unpressed
//! - `CellUpdate(coord)`: re-read the value from the matrix
//!
//! Dropping the cell removes all three subscriptions. The cell a long-press
//! lands on fires the host callbacks once the whole scope is pressed.
//!
//! # State
//!
//! | state | highlight |
//! |---|---|
//! | no value, unpressed | none, empty placeholder |
//! | no value, pressed | highlight, empty placeholder |
//! | value, unpressed | none |
//! | value, pressed | highlight |
//!
//! Pressing is idempotent; a cell that is already pressed stays pressed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{Property, SubscriptionGuard};

use crate::column::ColumnConfig;
use crate::context::GridContext;
use crate::events::{CellCoord, GridEvent, GridTopic, PressEvent, RowScope};
use crate::format::{format_value, CellContent};
use crate::matrix::SharedMatrix;
use crate::style::{
    resolve_highlight, CellBorder, CellBox, CellStyleOverrides, Color, RowPosition, TextStyle,
};
use crate::value::CellValue;

/// Mutable state reachable from broadcast handlers.
#[derive(Debug)]
struct CellState {
    value: Property<CellValue>,
    pressed: Property<bool>,
}

/// Everything a host needs to draw one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRender {
    pub content: CellContent,
    /// Background override; `None` means the host default.
    pub background: Option<Color>,
    pub border: CellBorder,
    /// Text style for the content's role; `None` for the placeholder.
    pub text_style: Option<TextStyle>,
    pub cell_box: CellBox,
}

/// One mounted cell of a grid.
///
/// # Example
///
/// ```
/// use horizon_grid::{ColumnConfig, GridContext, PressEvent, SharedMatrix};
///
/// let matrix = SharedMatrix::from_lines(vec![vec!["a", "b"], vec!["c", "d"]]);
/// let context = GridContext::new(matrix);
///
/// let first = context.mount_cell(ColumnConfig::string(), 0, 1);
/// let second = context.mount_cell(ColumnConfig::string(), 1, 1);
///
/// first.long_press(PressEvent::at(first.coord()));
/// assert!(first.is_pressed());
/// assert!(second.is_pressed());
///
/// second.release();
/// assert!(!first.is_pressed());
/// ```
#[derive(Debug)]
pub struct Cell {
    coord: CellCoord,
    column: ColumnConfig,
    overrides: CellStyleOverrides,
    context: GridContext,
    state: Arc<CellState>,
    seen_generation: AtomicU64,
    _subscriptions: [SubscriptionGuard<GridTopic, GridEvent>; 3],
}

static_assertions::assert_impl_all!(Cell: Send, Sync);

impl Cell {
    /// Mount a cell at (`parent_index`, `own_index`).
    ///
    /// The initial value is read from the context's matrix and the cell
    /// starts unpressed.
    pub fn mount(
        context: &GridContext,
        column: ColumnConfig,
        parent_index: usize,
        own_index: usize,
        overrides: CellStyleOverrides,
    ) -> Self {
        let coord = CellCoord::new(parent_index, own_index);
        let matrix = context.matrix().clone();
        let seen_generation = matrix.generation();
        let state = Arc::new(CellState {
            value: Property::new(matrix.get(parent_index, own_index)),
            pressed: Property::new(false),
        });

        let broadcaster = context.broadcaster();
        let scope = coord.scope();
        let subscriptions = [
            broadcaster.subscribe_scoped(
                GridTopic::RowPressIn(scope),
                press_in_handler(Arc::downgrade(&state)),
            ),
            broadcaster.subscribe_scoped(
                GridTopic::RowPressOut(scope),
                press_out_handler(Arc::downgrade(&state)),
            ),
            broadcaster.subscribe_scoped(
                GridTopic::CellUpdate(coord),
                force_update_handler(Arc::downgrade(&state), coord, matrix),
            ),
        ];

        tracing::debug!(
            target: targets::CELL,
            %coord,
            column_type = %column.column_type,
            "mounted cell"
        );

        Self {
            coord,
            column,
            overrides,
            context: context.clone(),
            state,
            seen_generation: AtomicU64::new(seen_generation),
            _subscriptions: subscriptions,
        }
    }

    /// The cell's coordinate.
    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    /// The press scope the cell belongs to.
    pub fn scope(&self) -> RowScope {
        self.coord.scope()
    }

    /// The column configuration.
    pub fn column(&self) -> &ColumnConfig {
        &self.column
    }

    /// The per-cell style overrides.
    pub fn overrides(&self) -> &CellStyleOverrides {
        &self.overrides
    }

    /// The current value.
    pub fn value(&self) -> CellValue {
        self.state.value.get()
    }

    /// Returns `true` if the cell holds a non-null value.
    pub fn has_value(&self) -> bool {
        self.state.value.with(CellValue::is_some)
    }

    /// Returns `true` while the cell's scope is pressed.
    pub fn is_pressed(&self) -> bool {
        self.state.pressed.get()
    }

    /// Increases whenever the value or the pressed state changes.
    ///
    /// Hosts compare it against the last drawn revision to decide whether to
    /// redraw.
    pub fn revision(&self) -> u64 {
        self.state.value.revision() + self.state.pressed.revision()
    }

    /// Report a long-press recognized on this cell.
    ///
    /// Every mounted cell in the scope becomes pressed, then this cell fires
    /// the host callbacks. The event's origin is set to this cell.
    ///
    /// Callbacks run after the broadcast has finished, so they see the whole
    /// scope pressed and may release it.
    pub fn long_press(&self, event: PressEvent) {
        let event = PressEvent {
            origin: self.coord,
            ..event
        };
        let reached = self.context.broadcaster().publish(
            &GridTopic::RowPressIn(self.scope()),
            GridEvent::PressIn(event.clone()),
        );
        tracing::trace!(target: targets::CELL, coord = %self.coord, reached, "long press");

        let callbacks = self.context.callbacks();
        let matrix = self.context.matrix();
        let CellCoord { parent_index, own_index } = self.coord;
        if let Some(on_cell_press) = &callbacks.on_cell_press {
            on_cell_press(&event, &matrix.get(parent_index, own_index));
        }
        if let Some(on_row_press) = &callbacks.on_row_press {
            on_row_press(&event, &matrix.values_along(own_index));
        }
    }

    /// Report that the press on this cell ended.
    ///
    /// Every mounted cell in the scope becomes unpressed.
    pub fn release(&self) {
        self.state.pressed.set(false);
        let reached = self.context.release_scope(self.scope());
        tracing::trace!(target: targets::CELL, coord = %self.coord, reached, "press out");
    }

    /// Re-read the value if the matrix changed since the last read.
    ///
    /// Returns `true` if the displayed value changed.
    pub fn sync_with_matrix(&self) -> bool {
        let matrix = self.context.matrix();
        let generation = matrix.generation();
        if self.seen_generation.swap(generation, Ordering::AcqRel) == generation {
            return false;
        }
        self.refresh()
    }

    /// Re-read the value unconditionally.
    ///
    /// Returns `true` if the displayed value changed.
    pub fn refresh(&self) -> bool {
        let value = self
            .context
            .matrix()
            .get(self.coord.parent_index, self.coord.own_index);
        self.state.value.set(value)
    }

    /// The formatted content for the current value.
    pub fn content(&self) -> CellContent {
        self.state
            .value
            .with(|value| format_value(value, &self.column, self.context.date_formatter()))
    }

    /// Background override for the current pressed state.
    pub fn highlight_color(&self) -> Option<Color> {
        resolve_highlight(self.context.style(), &self.overrides, self.is_pressed())
    }

    /// Where the cell's line sits in the matrix.
    pub fn row_position(&self) -> RowPosition {
        RowPosition::of(self.coord.parent_index, self.context.matrix().len())
    }

    /// The cell's border.
    pub fn border(&self) -> CellBorder {
        CellBorder::for_position(self.row_position(), self.context.style().cell_box.border_color)
    }

    /// Everything needed to draw the cell.
    pub fn render(&self) -> CellRender {
        let content = self.content();
        let style = self.context.style();
        let text_style = content.role().map(|role| style.text_style(role).clone());
        CellRender {
            content,
            background: self.highlight_color(),
            border: self.border(),
            text_style,
            cell_box: style.cell_box,
        }
    }
}

impl Drop for Cell {
    fn drop(&mut self) {
        tracing::debug!(target: targets::CELL, coord = %self.coord, "unmounted cell");
    }
}

fn press_in_handler(state: Weak<CellState>) -> impl Fn(&GridEvent) + Send + Sync + 'static {
    move |event| {
        if !matches!(event, GridEvent::PressIn(_)) {
            return;
        }
        if let Some(state) = state.upgrade() {
            state.pressed.set(true);
        }
    }
}

fn press_out_handler(state: Weak<CellState>) -> impl Fn(&GridEvent) + Send + Sync + 'static {
    move |event| {
        if !matches!(event, GridEvent::PressOut) {
            return;
        }
        if let Some(state) = state.upgrade() {
            state.pressed.set(false);
        }
    }
}

fn force_update_handler(
    state: Weak<CellState>,
    coord: CellCoord,
    matrix: SharedMatrix,
) -> impl Fn(&GridEvent) + Send + Sync + 'static {
    move |event| {
        if !matches!(event, GridEvent::ForceUpdate) {
            return;
        }
        if let Some(state) = state.upgrade() {
            let value = matrix.get(coord.parent_index, coord.own_index);
            if state.value.set(value) {
                tracing::trace!(target: targets::CELL, %coord, "value updated");
            }
        }
    }
}
