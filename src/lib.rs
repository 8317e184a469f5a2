//! Cell-grid layout engine.
//!
//! Items are rectangles on a 1-based column/row grid. The engine auto-places
//! items without coordinates, refuses overlaps, derives the grid extent from
//! what is occupied, and turns pixel drag deltas into grid moves. Every
//! operation on a [`Layout`] returns a new layout; rendering is left to the
//! caller, which only consumes pixel offsets and snapshots.

pub mod drag;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod settings;

pub use drag::{DragConfig, DragController, DragSession};
pub use error::{LayoutError, Result};
pub use geometry::{Axes, GridSpan};
pub use layout::{
    EXTENT_MARGIN, Item, ItemId, ItemSnapshot, LAST_CELL, Layout, LayoutSnapshot, MoveOutcome,
    MoveRejection, Occupancy, Slot,
};
pub use logging::{
    JsonLinesSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{DragMetricSnapshot, DragMetrics};
pub use settings::{ItemSettings, LayoutMode, LayoutSettings};
