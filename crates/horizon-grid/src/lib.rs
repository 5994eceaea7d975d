//! Horizon Grid - pressable, type-formatted grid cells.
//!
//! A grid is a [`SharedMatrix`] of [`CellValue`]s shown through mounted
//! [`Cell`]s. Every cell of one grid shares a [`GridContext`], which carries
//! the grid's broadcast channel. A long-press on any cell highlights every
//! cell in its scope (the cells sharing its `own_index`) and reports the
//! scope's values to the host.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//!
//! let matrix = SharedMatrix::from_lines(vec![
//!     vec!["Alice", "Bob"],
//!     vec!["42", "7"],
//! ]);
//!
//! let reported = Arc::new(Mutex::new(Vec::new()));
//! let sink = reported.clone();
//! let context = GridContext::new(matrix)
//!     .on_row_press(move |_event, values| sink.lock().extend_from_slice(values));
//!
//! let cells: Vec<Cell> = (0..2)
//!     .flat_map(|p| (0..2).map(move |o| (p, o)))
//!     .map(|(p, o)| context.mount_cell(ColumnConfig::string(), p, o))
//!     .collect();
//!
//! cells[1].long_press(PressEvent::at(cells[1].coord()));
//! assert!(cells[3].is_pressed());
//! assert!(!cells[0].is_pressed());
//! assert_eq!(*reported.lock(), vec![CellValue::from("Bob"), CellValue::from("7")]);
//!
//! cells[3].release();
//! assert_eq!(cells[1].highlight_color(), None);
//! ```

pub mod cell;
pub mod column;
pub mod config;
pub mod context;
pub mod date;
pub mod events;
pub mod format;
pub mod gesture;
pub mod matrix;
pub mod prelude;
pub mod style;
pub mod value;

pub use horizon_grid_core;
pub use horizon_grid_core::{GridError, Result};

pub use cell::{Cell, CellRender};
pub use column::{ColumnConfig, ColumnType};
pub use config::{GridConfig, TableStyleConfig, TextStyleConfig, TextStylesConfig};
pub use context::{CellPressHandler, GridBroadcaster, GridCallbacks, GridContext, RowPressHandler};
pub use date::{ChronoDateFormatter, DateFormatter};
pub use events::{CellCoord, GridEvent, GridTopic, PressEvent, PressPoint, RowScope};
pub use format::{format_value, CellContent, ElideMode, TextContent, ELLIPSIS};
pub use gesture::{LongPressConfig, LongPressRecognizer, PressOutcome};
pub use matrix::SharedMatrix;
pub use style::{
    resolve_highlight, CellBorder, CellBox, CellStyleOverrides, Color, RowPosition, TableStyle,
    TextRole, TextStyle,
};
pub use value::CellValue;
