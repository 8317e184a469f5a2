use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{LayoutError, Result};
use crate::geometry::{Axes, GridSpan};
use crate::settings::{ItemSettings, LayoutMode, LayoutSettings};

use super::item::{EXTENT_MARGIN, Item, ItemId, ItemSnapshot};
use super::occupancy::Occupancy;

/// Ordered item placements handed to the collaborator after each commit.
pub type LayoutSnapshot = Vec<ItemSnapshot>;

/// Why a move was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    /// The item is not part of this layout.
    UnknownItem(ItemId),
    /// The candidate would start before column or row 1, or run past the
    /// last addressable cell.
    OutOfBounds { start_column: i64, start_row: i64 },
    /// The candidate overlaps another item.
    Collision { with: ItemId },
}

/// Result of resolving a drag sample against a layout.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved(Layout),
    /// The candidate equals the item's current placement.
    Unchanged,
    Rejected(MoveRejection),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved(_))
    }

    /// The successor layout, or `current` when nothing was committed.
    pub fn into_layout_or(self, current: &Layout) -> Layout {
        match self {
            MoveOutcome::Moved(layout) => layout,
            MoveOutcome::Unchanged | MoveOutcome::Rejected(_) => current.clone(),
        }
    }
}

/// Immutable board: grid metrics plus non-overlapping items.
///
/// Every mutating operation returns a fresh `Layout`. Unchanged items are
/// shared between versions through `Arc`, which is safe because items are
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    mode: LayoutMode,
    slice_height: f64,
    slice_width: f64,
    gap: f64,
    available_width: Option<f64>,
    min_columns: u32,
    min_rows: u32,
    width_of_visible_area: f64,
    items: Vec<Arc<Item>>,
}

impl Layout {
    /// Build a layout from settings.
    ///
    /// Explicitly positioned items are taken as-is, in order. The rest are
    /// then auto-placed one by one, each seeing every item placed before it.
    /// Later duplicates of an id are ignored.
    pub fn create(settings: &LayoutSettings) -> Result<Self> {
        let slice_width = settings.effective_slice_width()?;

        let mut seen = HashSet::new();
        let mut placed = Vec::new();
        let mut unplaced = Vec::new();
        for definition in &settings.items {
            match definition.origin() {
                Some((start_column, start_row)) => {
                    let item = Item::try_new(
                        definition.id.clone(),
                        start_column,
                        start_row,
                        definition.filled_columns,
                        definition.filled_rows,
                    )?;
                    if seen.insert(item.id().to_string()) {
                        placed.push(Arc::new(item));
                    }
                }
                None => {
                    if definition.filled_columns == 0 || definition.filled_rows == 0 {
                        return Err(LayoutError::InvalidItem {
                            id: definition.id.clone(),
                            reason: "filled columns and rows must be at least 1".to_string(),
                        });
                    }
                    unplaced.push(definition.clone());
                }
            }
        }

        let base = Self {
            mode: settings.mode,
            slice_height: settings.slice_height,
            slice_width,
            gap: settings.gap,
            available_width: settings.available_width,
            min_columns: settings.total_columns,
            min_rows: settings.total_rows,
            width_of_visible_area: settings.width_of_visible_area,
            items: placed,
        };

        Ok(base.place_all(unplaced))
    }

    fn with_items(&self, items: Vec<Arc<Item>>) -> Self {
        Self {
            mode: self.mode,
            slice_height: self.slice_height,
            slice_width: self.slice_width,
            gap: self.gap,
            available_width: self.available_width,
            min_columns: self.min_columns,
            min_rows: self.min_rows,
            width_of_visible_area: self.width_of_visible_area,
            items,
        }
    }

    fn place_all(self, definitions: impl IntoIterator<Item = ItemSettings>) -> Self {
        definitions
            .into_iter()
            .fold(self, |layout, definition| layout.add_item(definition))
    }

    fn occupancy(&self) -> Occupancy<'_> {
        Occupancy::new(self.items(), self.slice_width, self.gap)
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn slice_height(&self) -> f64 {
        self.slice_height
    }

    pub fn slice_width(&self) -> f64 {
        self.slice_width
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn width_of_visible_area(&self) -> f64 {
        self.width_of_visible_area
    }

    pub fn min_columns(&self) -> u32 {
        self.min_columns
    }

    pub fn min_rows(&self) -> u32 {
        self.min_rows
    }

    /// Derived on every call: furthest occupied column plus the margin, never
    /// below the requested minimum.
    pub fn total_columns(&self) -> u32 {
        self.occupancy()
            .last_filled_column()
            .saturating_add(EXTENT_MARGIN)
            .max(self.min_columns)
    }

    pub fn total_rows(&self) -> u32 {
        self.occupancy()
            .last_filled_row()
            .saturating_add(EXTENT_MARGIN)
            .max(self.min_rows)
    }

    pub fn width(&self) -> f64 {
        (self.slice_width + self.gap) * self.total_columns() as f64
    }

    pub fn height(&self) -> f64 {
        (self.slice_height + self.gap) * self.total_rows() as f64
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().map(|item| item.as_ref())
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.item(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pixel box of `item` on this grid.
    pub fn span_of(&self, item: &Item) -> GridSpan {
        GridSpan::new(
            item.x_axis(self.slice_width, self.gap),
            item.y_axis(self.slice_height, self.gap),
            item.width(self.slice_width, self.gap),
            item.height(self.slice_height, self.gap),
        )
    }

    /// Add one item.
    ///
    /// A known id or an invalid footprint leaves the layout unchanged. With an
    /// origin the item is placed there as given; otherwise, including when a
    /// coordinate is 0, the occupancy scan picks the first free slot within
    /// the visible width.
    pub fn add_item(&self, definition: ItemSettings) -> Self {
        if self.contains(&definition.id) {
            return self.clone();
        }

        let (start_column, start_row) = match definition.origin() {
            Some(origin) => origin,
            None => {
                let slot = self.occupancy().next_slot(
                    definition.filled_columns,
                    definition.filled_rows,
                    self.width_of_visible_area,
                );
                (slot.start_column, slot.start_row)
            }
        };

        match Item::try_new(
            definition.id,
            start_column,
            start_row,
            definition.filled_columns,
            definition.filled_rows,
        ) {
            Ok(item) => {
                let mut items = self.items.clone();
                items.push(Arc::new(item));
                self.with_items(items)
            }
            Err(_) => self.clone(),
        }
    }

    /// Full reflow: every item is auto-placed again, in current order,
    /// against the requested minimum extent.
    pub fn apply_auto_position(&self) -> Self {
        let definitions: Vec<ItemSettings> = self
            .items()
            .map(|item| ItemSettings::from(item.to_object()).without_origin())
            .collect();
        self.with_items(Vec::new()).place_all(definitions)
    }

    /// Signed column delta for a horizontal pointer and scroll movement.
    pub fn columns_to_move(&self, mouse_delta: f64, scroll_delta: f64) -> i64 {
        cells_to_move(mouse_delta + scroll_delta, self.slice_width + self.gap)
    }

    pub fn rows_to_move(&self, mouse_delta: f64, scroll_delta: f64) -> i64 {
        cells_to_move(mouse_delta + scroll_delta, self.slice_height + self.gap)
    }

    /// Resolve a drag sample into a move of `item_to_move`.
    ///
    /// Deltas are measured between the `last_*` samples (usually taken at drag
    /// start) and the `current_*` samples, and applied to `item_to_move`'s
    /// origin. The candidate replaces the stored item in place.
    pub fn try_move_item(
        &self,
        item_to_move: &Item,
        current_mouse_axes: Axes,
        last_mouse_axes: Axes,
        current_scroll_axes: Axes,
        last_scroll_axes: Axes,
    ) -> MoveOutcome {
        let Some(index) = self
            .items
            .iter()
            .position(|item| item.id() == item_to_move.id())
        else {
            return MoveOutcome::Rejected(MoveRejection::UnknownItem(item_to_move.id().to_string()));
        };

        let mouse = current_mouse_axes.delta_since(last_mouse_axes);
        let scroll = current_scroll_axes.delta_since(last_scroll_axes);
        let start_column = i64::from(item_to_move.start_column())
            .saturating_add(self.columns_to_move(mouse.x_axis, scroll.x_axis));
        let start_row = i64::from(item_to_move.start_row())
            .saturating_add(self.rows_to_move(mouse.y_axis, scroll.y_axis));

        // Off the top/left edge, or far enough right/down to leave the addressable grid.
        let candidate = match (u32::try_from(start_column), u32::try_from(start_row)) {
            (Ok(column), Ok(row)) => item_to_move.relocated(column, row),
            _ => None,
        };
        let Some(candidate) = candidate else {
            return MoveOutcome::Rejected(MoveRejection::OutOfBounds {
                start_column,
                start_row,
            });
        };
        if *self.items[index] == candidate {
            return MoveOutcome::Unchanged;
        }
        if let Some(blocker) = self.items().find(|item| item.has_collision(&candidate)) {
            return MoveOutcome::Rejected(MoveRejection::Collision {
                with: blocker.id().to_string(),
            });
        }

        let mut items = self.items.clone();
        items[index] = Arc::new(candidate);
        MoveOutcome::Moved(self.with_items(items))
    }

    /// Like [`Layout::try_move_item`], returning this layout when the move
    /// is not committed.
    pub fn move_item(
        &self,
        item_to_move: &Item,
        current_mouse_axes: Axes,
        last_mouse_axes: Axes,
        current_scroll_axes: Axes,
        last_scroll_axes: Axes,
    ) -> Self {
        self.try_move_item(
            item_to_move,
            current_mouse_axes,
            last_mouse_axes,
            current_scroll_axes,
            last_scroll_axes,
        )
        .into_layout_or(self)
    }

    pub fn to_object(&self) -> LayoutSnapshot {
        self.items().map(Item::to_object).collect()
    }

    /// Content hash of the placements, for cheap change detection.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for item in self.items() {
            hasher.update(&(item.id().len() as u64).to_le_bytes());
            hasher.update(item.id().as_bytes());
            for value in [
                item.start_column(),
                item.start_row(),
                item.filled_columns(),
                item.filled_rows(),
            ] {
                hasher.update(&value.to_le_bytes());
            }
        }
        hasher.finalize()
    }

    /// Settings that recreate this layout with every item at its current
    /// coordinates.
    pub fn settings(&self) -> LayoutSettings {
        LayoutSettings {
            mode: self.mode,
            slice_height: self.slice_height,
            slice_width: Some(self.slice_width),
            gap: self.gap,
            total_columns: self.min_columns,
            total_rows: self.min_rows,
            available_width: self.available_width,
            width_of_visible_area: self.width_of_visible_area,
            items: Vec::new(),
        }
        .with_items(self.to_object())
    }
}

/// Half-up rounding of a pixel distance into whole cells.
fn cells_to_move(distance: f64, pitch: f64) -> i64 {
    if pitch.is_nan() || pitch <= 0.0 {
        return 0;
    }
    let cells = (distance / pitch + 0.5).floor();
    if cells.is_finite() {
        cells as i64
    } else {
        0
    }
}
