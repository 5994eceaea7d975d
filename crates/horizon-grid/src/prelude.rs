//! Prelude module for Horizon Grid.
//!
//! ```ignore
//! use horizon_grid::prelude::*;
//! ```

// ============================================================================
// Data
// ============================================================================

pub use crate::column::{ColumnConfig, ColumnType};
pub use crate::matrix::SharedMatrix;
pub use crate::value::CellValue;

// ============================================================================
// Cells and Context
// ============================================================================

pub use crate::cell::{Cell, CellRender};
pub use crate::context::{GridCallbacks, GridContext};
pub use crate::events::{CellCoord, PressEvent, PressPoint, RowScope};
pub use crate::gesture::{LongPressRecognizer, PressOutcome};

// ============================================================================
// Formatting and Style
// ============================================================================

pub use crate::config::GridConfig;
pub use crate::date::{ChronoDateFormatter, DateFormatter};
pub use crate::format::{format_value, CellContent};
pub use crate::style::{CellStyleOverrides, Color, TableStyle, TextRole, TextStyle};
