use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Opaque item identifier, unique within a layout.
pub type ItemId = String;

/// Empty cells kept past the furthest occupied column/row.
pub const EXTENT_MARGIN: u32 = 3;

/// Furthest addressable column or row; leaves room for the extent margin.
pub const LAST_CELL: u32 = u32::MAX - EXTENT_MARGIN;

/// Last cell covered by a span starting at `start`, or `None` when it would
/// run past [`LAST_CELL`].
pub(crate) fn span_end(start: u32, filled: u32) -> Option<u32> {
    start
        .checked_add(filled.checked_sub(1)?)
        .filter(|end| *end <= LAST_CELL)
}

/// Grid footprint of one rectangle.
///
/// Coordinates are 1-based. The end column/row are computed once on
/// construction; an `Item` is never mutated afterwards; moving it produces a
/// new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    id: ItemId,
    start_column: u32,
    end_column: u32,
    start_row: u32,
    end_row: u32,
    filled_columns: u32,
    filled_rows: u32,
}

impl Item {
    /// Build an item, rejecting zero spans, zero coordinates and spans that
    /// run past [`LAST_CELL`].
    pub fn try_new(
        id: impl Into<ItemId>,
        start_column: u32,
        start_row: u32,
        filled_columns: u32,
        filled_rows: u32,
    ) -> Result<Self> {
        let id = id.into();
        let invalid = |reason: &str| LayoutError::InvalidItem {
            id: id.clone(),
            reason: reason.to_string(),
        };

        if filled_columns == 0 {
            return Err(invalid("filled columns must be at least 1"));
        }
        if filled_rows == 0 {
            return Err(invalid("filled rows must be at least 1"));
        }
        if start_column == 0 {
            return Err(invalid("start column must be at least 1"));
        }
        if start_row == 0 {
            return Err(invalid("start row must be at least 1"));
        }
        let Some(end_column) = span_end(start_column, filled_columns) else {
            return Err(invalid("columns extend past the last addressable cell"));
        };
        let Some(end_row) = span_end(start_row, filled_rows) else {
            return Err(invalid("rows extend past the last addressable cell"));
        };

        Ok(Self {
            id,
            start_column,
            end_column,
            start_row,
            end_row,
            filled_columns,
            filled_rows,
        })
    }

    /// Build an item.
    ///
    /// # Panics
    /// Panics on geometry [`Item::try_new`] rejects.
    pub fn new(
        id: impl Into<ItemId>,
        start_column: u32,
        start_row: u32,
        filled_columns: u32,
        filled_rows: u32,
    ) -> Self {
        match Self::try_new(id, start_column, start_row, filled_columns, filled_rows) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }

    /// Same id and footprint, anchored at a new origin, or `None` when the
    /// footprint would leave the addressable grid.
    pub(crate) fn relocated(&self, start_column: u32, start_row: u32) -> Option<Self> {
        if start_column == 0 || start_row == 0 {
            return None;
        }
        Some(Self {
            id: self.id.clone(),
            start_column,
            end_column: span_end(start_column, self.filled_columns)?,
            start_row,
            end_row: span_end(start_row, self.filled_rows)?,
            filled_columns: self.filled_columns,
            filled_rows: self.filled_rows,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_column(&self) -> u32 {
        self.start_column
    }

    pub fn end_column(&self) -> u32 {
        self.end_column
    }

    pub fn start_row(&self) -> u32 {
        self.start_row
    }

    pub fn end_row(&self) -> u32 {
        self.end_row
    }

    pub fn filled_columns(&self) -> u32 {
        self.filled_columns
    }

    pub fn filled_rows(&self) -> u32 {
        self.filled_rows
    }

    /// Pixel width: gaps sit between cells, never after the last one.
    pub fn width(&self, slice_width: f64, gap: f64) -> f64 {
        self.filled_columns as f64 * (slice_width + gap) - gap
    }

    pub fn height(&self, slice_height: f64, gap: f64) -> f64 {
        self.filled_rows as f64 * (slice_height + gap) - gap
    }

    /// Left pixel offset from the grid origin.
    pub fn x_axis(&self, slice_width: f64, gap: f64) -> f64 {
        (self.start_column - 1) as f64 * (slice_width + gap)
    }

    pub fn y_axis(&self, slice_height: f64, gap: f64) -> f64 {
        (self.start_row - 1) as f64 * (slice_height + gap)
    }

    /// Inclusive rectangle intersection. An item never collides with itself,
    /// judged by id rather than position.
    pub fn has_collision(&self, other: &Item) -> bool {
        if self.id == other.id {
            return false;
        }
        self.start_column <= other.end_column
            && other.start_column <= self.end_column
            && self.start_row <= other.end_row
            && other.start_row <= self.end_row
    }

    pub fn to_object(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id.clone(),
            start_column: self.start_column,
            start_row: self.start_row,
            filled_columns: self.filled_columns,
            filled_rows: self.filled_rows,
        }
    }
}

/// Serializable view of an item without derived fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub start_column: u32,
    pub start_row: u32,
    pub filled_columns: u32,
    pub filled_rows: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, start_column: u32) -> Item {
        Item::new(id, start_column, 1, 2, 2)
    }

    #[test]
    fn end_column_and_row_follow_span() {
        let item = item("any_id", 1);
        assert_eq!(item.end_column(), 2);
        assert_eq!(item.end_row(), 2);
    }

    #[test]
    fn overlapping_items_collide() {
        assert!(item("a", 1).has_collision(&item("b", 2)));
    }

    #[test]
    fn adjacent_items_do_not_collide() {
        assert!(!item("a", 1).has_collision(&item("b", 3)));
    }

    #[test]
    fn same_id_never_collides() {
        assert!(!item("a", 1).has_collision(&item("a", 2)));
    }

    #[test]
    fn pixel_geometry_excludes_trailing_gap() {
        let item = Item::new("a", 1, 1, 2, 2);
        assert_eq!(item.width(85.0, 5.0), 175.0);
        assert_eq!(item.height(85.0, 5.0), 175.0);
        assert_eq!(item.x_axis(85.0, 5.0), 0.0);

        let shifted = Item::new("b", 3, 2, 1, 1);
        assert_eq!(shifted.x_axis(85.0, 5.0), 180.0);
        assert_eq!(shifted.y_axis(85.0, 5.0), 90.0);
    }

    #[test]
    fn try_new_rejects_zero_span() {
        let err = Item::try_new("a", 1, 1, 0, 1).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidItem { ref id, .. } if id == "a"));
    }

    #[test]
    #[should_panic(expected = "start row must be at least 1")]
    fn new_panics_on_zero_row() {
        Item::new("a", 1, 0, 1, 1);
    }

    #[test]
    fn try_new_rejects_span_past_last_cell() {
        let err = Item::try_new("x", u32::MAX, 1, 2, 1).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidItem { ref reason, .. } if reason.contains("columns")));
        assert!(Item::try_new("x", 1, LAST_CELL, 1, 2).is_err());
        assert!(Item::try_new("x", 1, 1, u32::MAX, 1).is_err());
    }

    #[test]
    fn span_ending_on_last_cell_is_accepted() {
        let item = Item::try_new("edge", LAST_CELL - 1, LAST_CELL, 2, 1).unwrap();
        assert_eq!(item.end_column(), LAST_CELL);
        assert_eq!(item.end_row(), LAST_CELL);
    }

    #[test]
    fn relocation_past_last_cell_is_refused() {
        let item = Item::new("a", 1, 1, 3, 1);
        assert!(item.relocated(LAST_CELL - 1, 1).is_none());
        assert!(item.relocated(0, 1).is_none());
        assert_eq!(item.relocated(LAST_CELL - 2, 1).unwrap().end_column(), LAST_CELL);
    }

    #[test]
    fn snapshot_omits_derived_fields() {
        let json = serde_json::to_value(Item::new("a", 3, 4, 2, 1).to_object()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a",
                "startColumn": 3,
                "startRow": 4,
                "filledColumns": 2,
                "filledRows": 1,
            })
        );
    }
}
