//! Shared value matrix backing a grid.
//!
//! The host owns the data and mutates it; every mounted cell holds a cheap
//! clone of the same [`SharedMatrix`] and only reads from it. Each mutation
//! bumps a generation counter so cells can tell whether a re-read is worth
//! doing without comparing the whole structure.
//!
//! The outer index is a cell's `parent_index`, the inner index its
//! `own_index`. Lines may have different lengths; reading outside the data
//! yields [`CellValue::Null`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use horizon_grid_core::logging::{span_names, targets};
use horizon_grid_core::{GridError, PerfSpan, Result};

use crate::value::CellValue;

struct MatrixInner {
    lines: RwLock<Vec<Vec<CellValue>>>,
    generation: AtomicU64,
}

/// A reference-counted, read-mostly two-dimensional value store.
///
/// Cloning a `SharedMatrix` clones the handle, not the data.
///
/// # Example
///
/// ```
/// use horizon_grid::{CellValue, SharedMatrix};
///
/// let matrix = SharedMatrix::new(vec![
///     vec![CellValue::from("a"), CellValue::from(1)],
///     vec![CellValue::from("b"), CellValue::from(2)],
/// ]);
///
/// let view = matrix.clone();
/// assert_eq!(view.get(1, 1), CellValue::from(2));
///
/// matrix.set(1, 1, CellValue::from(3));
/// assert_eq!(view.get(1, 1), CellValue::from(3));
/// assert_eq!(view.generation(), 1);
/// ```
#[derive(Clone)]
pub struct SharedMatrix {
    inner: Arc<MatrixInner>,
}

impl Default for SharedMatrix {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SharedMatrix {
    /// Creates a matrix from its lines.
    pub fn new(lines: Vec<Vec<CellValue>>) -> Self {
        Self {
            inner: Arc::new(MatrixInner {
                lines: RwLock::new(lines),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Creates a matrix from anything convertible into cell values.
    pub fn from_lines<L, V>(lines: L) -> Self
    where
        L: IntoIterator,
        L::Item: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self::new(
            lines
                .into_iter()
                .map(|line| line.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// Parses a matrix from a JSON array of arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        let lines: Vec<Vec<CellValue>> =
            serde_json::from_str(json).map_err(|e| GridError::parse("JSON", e.to_string()))?;
        Ok(Self::new(lines))
    }

    /// Returns the value at `(parent_index, own_index)`, or `Null` when the
    /// coordinate is outside the data.
    pub fn get(&self, parent_index: usize, own_index: usize) -> CellValue {
        self.with_value(parent_index, own_index, |value| {
            value.cloned().unwrap_or_default()
        })
    }

    /// Access the value at a coordinate without cloning.
    pub fn with_value<F, R>(&self, parent_index: usize, own_index: usize, f: F) -> R
    where
        F: FnOnce(Option<&CellValue>) -> R,
    {
        let lines = self.inner.lines.read();
        f(lines.get(parent_index).and_then(|line| line.get(own_index)))
    }

    /// Collects `matrix[i][own_index]` for every outer index `i`, in order.
    ///
    /// Lines too short to hold `own_index` contribute `Null`, so the result
    /// always has [`len`](Self::len) elements.
    pub fn values_along(&self, own_index: usize) -> Vec<CellValue> {
        self.inner
            .lines
            .read()
            .iter()
            .map(|line| line.get(own_index).cloned().unwrap_or_default())
            .collect()
    }

    /// Number of lines (outer length).
    pub fn len(&self) -> usize {
        self.inner.lines.read().len()
    }

    /// Returns `true` if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.inner.lines.read().is_empty()
    }

    /// Length of line `parent_index`, or 0 if it does not exist.
    pub fn line_len(&self, parent_index: usize) -> usize {
        self.inner
            .lines
            .read()
            .get(parent_index)
            .map_or(0, Vec::len)
    }

    /// Mutation counter, incremented by every effective change.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Returns `true` if both handles share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copies out the current contents.
    pub fn snapshot(&self) -> Vec<Vec<CellValue>> {
        self.inner.lines.read().clone()
    }

    /// Writes one value.
    ///
    /// Returns `true` if the coordinate exists and the value changed. Writes
    /// outside the data are ignored.
    pub fn set(&self, parent_index: usize, own_index: usize, value: CellValue) -> bool {
        let mut lines = self.inner.lines.write();
        let Some(slot) = lines
            .get_mut(parent_index)
            .and_then(|line| line.get_mut(own_index))
        else {
            tracing::debug!(
                target: targets::MATRIX,
                parent_index,
                own_index,
                "write outside matrix ignored"
            );
            return false;
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        self.bump();
        true
    }

    /// Replaces all contents.
    pub fn replace(&self, lines: Vec<Vec<CellValue>>) {
        let _span = PerfSpan::new(span_names::MATRIX);
        *self.inner.lines.write() = lines;
        self.bump();
    }

    /// Mutates the contents through a closure; always counts as a change.
    pub fn modify<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<Vec<CellValue>>) -> R,
    {
        let _span = PerfSpan::new(span_names::MATRIX);
        let result = {
            let mut lines = self.inner.lines.write();
            f(&mut *lines)
        };
        self.bump();
        result
    }

    fn bump(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(target: targets::MATRIX, generation, "matrix changed");
    }
}

impl fmt::Debug for SharedMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedMatrix")
            .field("lines", &self.len())
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SharedMatrix {
        SharedMatrix::from_lines(vec![
            vec![CellValue::from(1), CellValue::from(2)],
            vec![CellValue::from(3)],
            vec![CellValue::from(5), CellValue::from(6)],
        ])
    }

    #[test]
    fn test_get_out_of_range_is_null() {
        let matrix = sample();
        assert_eq!(matrix.get(0, 1), CellValue::from(2));
        assert!(matrix.get(1, 1).is_null());
        assert!(matrix.get(7, 0).is_null());
    }

    #[test]
    fn test_values_along_pads_short_lines() {
        let matrix = sample();
        assert_eq!(
            matrix.values_along(1),
            vec![CellValue::from(2), CellValue::Null, CellValue::from(6)]
        );
        assert_eq!(matrix.values_along(1).len(), matrix.len());
    }

    #[test]
    fn test_set_bumps_generation_only_on_change() {
        let matrix = sample();
        assert!(!matrix.set(0, 0, CellValue::from(1)));
        assert_eq!(matrix.generation(), 0);

        assert!(matrix.set(0, 0, CellValue::from(10)));
        assert_eq!(matrix.generation(), 1);

        assert!(!matrix.set(9, 9, CellValue::from(10)));
        assert_eq!(matrix.generation(), 1);
    }

    #[test]
    fn test_clones_share_storage() {
        let matrix = sample();
        let view = matrix.clone();
        assert!(view.ptr_eq(&matrix));
        assert!(!view.ptr_eq(&sample()));

        matrix.replace(vec![vec![CellValue::from("x")]]);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(0, 0), CellValue::from("x"));
    }

    #[test]
    fn test_modify() {
        let matrix = sample();
        matrix.modify(|lines| lines[1].push(CellValue::from(4)));
        assert_eq!(matrix.line_len(1), 2);
        assert_eq!(matrix.generation(), 1);
    }

    #[test]
    fn test_from_json() {
        let matrix = SharedMatrix::from_json(r#"[["a", 1], [null, 2.5]]"#).unwrap();
        assert_eq!(matrix.get(0, 0), CellValue::from("a"));
        assert!(matrix.get(1, 0).is_null());
        assert_eq!(matrix.get(1, 1), CellValue::from(2.5));

        assert!(SharedMatrix::from_json("[[").is_err());
    }
}
