//! Change-tracking properties.
//!
//! A [`Property<T>`] wraps a value behind a lock and reports whether a write
//! actually changed it. Every effective change bumps a revision counter, which
//! lets a renderer ask "has anything I display changed since I last drew?"
//! without comparing values itself.
//!
//! # Example
//!
//! ```
//! use horizon_grid_core::Property;
//!
//! let prop = Property::new(42);
//! assert_eq!(prop.get(), 42);
//!
//! // Writing the same value is not a change
//! assert!(!prop.set(42));
//! assert_eq!(prop.revision(), 0);
//!
//! assert!(prop.set(100));
//! assert_eq!(prop.get(), 100);
//! assert_eq!(prop.revision(), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// A value with change detection and a revision counter.
///
/// `Property<T>` uses interior mutability and is `Send + Sync` whenever `T` is.
pub struct Property<T> {
    value: RwLock<T>,
    revision: AtomicU64,
}

impl<T: Clone> Property<T> {
    /// Create a property holding `value` at revision 0.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            revision: AtomicU64::new(0),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Number of effective changes since creation.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it differed from the current one.
    ///
    /// Equal values leave both the value and the revision untouched.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value, returning the previous one if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current == value {
            return None;
        }
        let old = std::mem::replace(&mut *current, value);
        self.revision.fetch_add(1, Ordering::AcqRel);
        Some(old)
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .field("revision", &self.revision())
            .finish()
    }
}
