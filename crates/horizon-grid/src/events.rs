//! Broadcast topics and payloads exchanged between cells.
//!
//! Topics are structured keys rather than concatenated strings, so a press
//! scope and a cell address can never be confused with each other.
//!
//! # Scope Axis
//!
//! A press scope is the set of cells sharing the same `own_index`. It is the
//! same set whose values are reported to the row-press callback, which reads
//! `matrix[i][own_index]` for every `i`. Highlight and report always agree.

use std::fmt;
use std::time::Duration;

/// Coordinate of one cell in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Outer matrix index.
    pub parent_index: usize,
    /// Inner matrix index.
    pub own_index: usize,
}

impl CellCoord {
    /// Create a coordinate.
    pub const fn new(parent_index: usize, own_index: usize) -> Self {
        Self {
            parent_index,
            own_index,
        }
    }

    /// The press scope this cell belongs to.
    pub const fn scope(self) -> RowScope {
        RowScope(self.own_index)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.parent_index, self.own_index)
    }
}

/// A group of cells that highlight together, keyed by `own_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowScope(pub usize);

impl RowScope {
    /// The shared `own_index` of the scope.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Addresses on a grid's broadcast channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridTopic {
    /// A long-press started somewhere in the scope.
    RowPressIn(RowScope),
    /// The press in the scope ended.
    RowPressOut(RowScope),
    /// The host changed the value of one cell.
    CellUpdate(CellCoord),
}

/// A position in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressPoint {
    pub x: f32,
    pub y: f32,
}

impl PressPoint {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The gesture that started a long-press.
#[derive(Debug, Clone, PartialEq)]
pub struct PressEvent {
    /// The cell the gesture landed on.
    pub origin: CellCoord,
    /// Where the press happened, in host coordinates.
    pub position: PressPoint,
    /// How long the press was held before it was recognized.
    pub held_for: Duration,
}

impl PressEvent {
    /// A press on `origin` with no position information.
    pub fn at(origin: CellCoord) -> Self {
        Self {
            origin,
            position: PressPoint::default(),
            held_for: Duration::ZERO,
        }
    }

    /// Sets the press position.
    pub fn with_position(mut self, position: PressPoint) -> Self {
        self.position = position;
        self
    }
}

/// Payload carried on a grid's broadcast channel.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Sent on [`GridTopic::RowPressIn`].
    PressIn(PressEvent),
    /// Sent on [`GridTopic::RowPressOut`].
    PressOut,
    /// Sent on [`GridTopic::CellUpdate`].
    ForceUpdate,
}
