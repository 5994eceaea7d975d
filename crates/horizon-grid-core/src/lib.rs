//! Core systems for Horizon Grid.
//!
//! This crate provides the building blocks the grid widgets are made of:
//!
//! - **Broadcast Channel**: Topic-keyed publish/subscribe between components
//!   that hold no reference to each other
//! - **Property System**: Values with change detection and revision counters
//! - **Errors**: The error type of the configuration layer
//! - **Logging**: `tracing` targets, span names and helper macros
//!
//! # Broadcast Example
//!
//! ```
//! use horizon_grid_core::Broadcaster;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Topic {
//!     Row(usize),
//! }
//!
//! let broadcaster = Broadcaster::<Topic, bool>::new();
//! let id = broadcaster.subscribe(Topic::Row(2), |pressed| {
//!     println!("row 2 pressed: {}", pressed);
//! });
//!
//! broadcaster.publish(&Topic::Row(2), true);
//! broadcaster.unsubscribe(&Topic::Row(2), id);
//! ```

pub mod broadcast;
mod error;
pub mod logging;
pub mod property;

pub use broadcast::{Broadcaster, SubscriptionGuard, SubscriptionId};
pub use error::{GridError, Result};
pub use logging::PerfSpan;
pub use property::Property;
