//! Occupancy queries over a set of placed items.
//!
//! The index holds nothing but borrowed items and the column metrics. It is
//! rebuilt from scratch for every query batch, so there is no incremental
//! state to fall out of sync with the owning layout.

use std::collections::BTreeSet;

use super::item::{Item, span_end};

/// Absorbs float noise when deriving whole columns from responsive slice widths.
const COLUMN_EPSILON: f64 = 1e-9;

/// Origin cell chosen for an auto-placed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start_column: u32,
    pub start_row: u32,
}

#[derive(Debug, Clone)]
pub struct Occupancy<'a> {
    items: Vec<&'a Item>,
    slice_width: f64,
    gap: f64,
}

impl<'a> Occupancy<'a> {
    pub fn new(items: impl IntoIterator<Item = &'a Item>, slice_width: f64, gap: f64) -> Self {
        Self {
            items: items.into_iter().collect(),
            slice_width,
            gap,
        }
    }

    /// Furthest occupied column, 0 when empty.
    pub fn last_filled_column(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.end_column())
            .max()
            .unwrap_or(0)
    }

    /// Furthest occupied row, 0 when empty.
    pub fn last_filled_row(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.end_row())
            .max()
            .unwrap_or(0)
    }

    pub fn is_occupied(&self, column: u32, row: u32) -> bool {
        self.items.iter().any(|item| {
            item.start_column() <= column
                && column <= item.end_column()
                && item.start_row() <= row
                && row <= item.end_row()
        })
    }

    /// Whole columns whose right edge stays within `width_of_visible_area`.
    pub fn columns_in_view(&self, width_of_visible_area: f64) -> u32 {
        let pitch = self.slice_width + self.gap;
        if pitch.is_nan() || pitch <= 0.0 || !width_of_visible_area.is_finite() {
            return 0;
        }
        let columns = ((width_of_visible_area + self.gap) / pitch + COLUMN_EPSILON).floor();
        if columns <= 0.0 {
            0
        } else {
            columns.min(u32::MAX as f64) as u32
        }
    }

    /// First free origin in row-major order (lowest row, then lowest column).
    ///
    /// Origins are limited to those keeping the item inside the visible width.
    /// An item wider than the visible area can only start at column 1. Rows
    /// past the last occupied one are always free, so the scan is bounded.
    /// When even that row cannot hold the footprint, the returned slot lies
    /// outside the addressable grid and [`Item::try_new`] refuses it.
    pub fn next_slot(
        &self,
        filled_columns: u32,
        filled_rows: u32,
        width_of_visible_area: f64,
    ) -> Slot {
        let filled_columns = filled_columns.max(1);
        let filled_rows = filled_rows.max(1);
        let in_view = self.columns_in_view(width_of_visible_area);
        let last_origin_column = if in_view >= filled_columns {
            in_view - filled_columns + 1
        } else {
            1
        };

        // The lowest free origin starts at 1 or right past an item's edge.
        let rows = self.origin_candidates(Item::end_row, u32::MAX);
        let columns = self.origin_candidates(Item::end_column, last_origin_column);
        for &start_row in &rows {
            for &start_column in &columns {
                if self.region_is_free(start_column, start_row, filled_columns, filled_rows) {
                    return Slot {
                        start_column,
                        start_row,
                    };
                }
            }
        }

        Slot {
            start_column: 1,
            start_row: self.last_filled_row().saturating_add(1),
        }
    }

    fn origin_candidates(&self, edge: impl Fn(&Item) -> u32, limit: u32) -> BTreeSet<u32> {
        std::iter::once(1)
            .chain(self.items.iter().filter_map(|item| edge(item).checked_add(1)))
            .filter(|origin| *origin <= limit)
            .collect()
    }

    fn region_is_free(
        &self,
        start_column: u32,
        start_row: u32,
        filled_columns: u32,
        filled_rows: u32,
    ) -> bool {
        let (Some(end_column), Some(end_row)) = (
            span_end(start_column, filled_columns),
            span_end(start_row, filled_rows),
        ) else {
            return false;
        };
        !self.items.iter().any(|item| {
            start_column <= item.end_column()
                && item.start_column() <= end_column
                && start_row <= item.end_row()
                && item.start_row() <= end_row
        })
    }
}
