//! Grid layout engine.
//!
//! [`Item`] is the immutable footprint of one rectangle, [`Occupancy`] answers
//! free-space queries over a set of items, and [`Layout`] is the aggregate
//! that owns placement, collision rejection, reflow and drag resolution.

mod core;
pub mod item;
pub mod occupancy;

pub use core::{Layout, LayoutSnapshot, MoveOutcome, MoveRejection};
pub use item::{EXTENT_MARGIN, Item, ItemId, ItemSnapshot, LAST_CELL};
pub use occupancy::{Occupancy, Slot};
