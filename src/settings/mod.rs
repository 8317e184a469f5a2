//! Boundary settings supplied by the presentation layer.
//!
//! Field names serialize in camelCase so settings can be exchanged as JSON
//! with the collaborator unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::layout::{ItemId, ItemSnapshot};

/// How the cell width is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Cell width is an explicit pixel constant.
    #[default]
    Fixed,
    /// Cell width is the available width divided by the column count.
    HorizontallyResponsive,
}

/// One item definition; coordinates are optional and auto-placed when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSettings {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_row: Option<u32>,
    pub filled_columns: u32,
    pub filled_rows: u32,
}

impl ItemSettings {
    pub fn placed(
        id: impl Into<ItemId>,
        start_column: u32,
        start_row: u32,
        filled_columns: u32,
        filled_rows: u32,
    ) -> Self {
        Self {
            id: id.into(),
            start_column: Some(start_column),
            start_row: Some(start_row),
            filled_columns,
            filled_rows,
        }
    }

    pub fn unplaced(id: impl Into<ItemId>, filled_columns: u32, filled_rows: u32) -> Self {
        Self {
            id: id.into(),
            start_column: None,
            start_row: None,
            filled_columns,
            filled_rows,
        }
    }

    /// Explicit origin, present only when both coordinates are given and
    /// non-zero. Anything else is auto-placed.
    pub fn origin(&self) -> Option<(u32, u32)> {
        self.start_column
            .zip(self.start_row)
            .filter(|(column, row)| *column > 0 && *row > 0)
    }

    /// Drops the coordinates, keeping id and footprint.
    pub fn without_origin(self) -> Self {
        Self {
            start_column: None,
            start_row: None,
            ..self
        }
    }
}

impl From<ItemSnapshot> for ItemSettings {
    fn from(snapshot: ItemSnapshot) -> Self {
        Self::placed(
            snapshot.id,
            snapshot.start_column,
            snapshot.start_row,
            snapshot.filled_columns,
            snapshot.filled_rows,
        )
    }
}

/// Grid configuration plus the initial item set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    #[serde(default)]
    pub mode: LayoutMode,
    pub slice_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice_width: Option<f64>,
    #[serde(default)]
    pub gap: f64,
    /// Minimum column count requested by the caller.
    pub total_columns: u32,
    /// Minimum row count requested by the caller.
    pub total_rows: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_width: Option<f64>,
    /// Required: auto-placement keeps items within this pixel width.
    pub width_of_visible_area: f64,
    #[serde(default)]
    pub items: Vec<ItemSettings>,
}

impl LayoutSettings {
    pub fn fixed(
        slice_width: f64,
        slice_height: f64,
        gap: f64,
        total_columns: u32,
        total_rows: u32,
    ) -> Self {
        Self {
            mode: LayoutMode::Fixed,
            slice_height,
            slice_width: Some(slice_width),
            gap,
            total_columns,
            total_rows,
            available_width: None,
            width_of_visible_area: 0.0,
            items: Vec::new(),
        }
    }

    pub fn responsive(
        available_width: f64,
        slice_height: f64,
        gap: f64,
        total_columns: u32,
        total_rows: u32,
    ) -> Self {
        Self {
            mode: LayoutMode::HorizontallyResponsive,
            slice_height,
            slice_width: None,
            gap,
            total_columns,
            total_rows,
            available_width: Some(available_width),
            width_of_visible_area: 0.0,
            items: Vec::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_visible_width(mut self, width_of_visible_area: f64) -> Self {
        self.width_of_visible_area = width_of_visible_area;
        self
    }

    pub fn with_item(mut self, item: ItemSettings) -> Self {
        self.items.push(item);
        self
    }

    /// Replaces the item set with stored placements, treated as explicit.
    pub fn with_items(mut self, snapshot: impl IntoIterator<Item = ItemSnapshot>) -> Self {
        self.items = snapshot.into_iter().map(ItemSettings::from).collect();
        self
    }

    /// Cell width for the configured mode.
    ///
    /// A missing or zero width is a configuration error.
    pub fn effective_slice_width(&self) -> Result<f64> {
        match self.mode {
            LayoutMode::Fixed => match self.slice_width {
                Some(width) if width != 0.0 && width.is_finite() => Ok(width),
                _ => Err(LayoutError::MissingSliceWidth),
            },
            LayoutMode::HorizontallyResponsive => {
                let available = match self.available_width {
                    Some(width) if width != 0.0 && width.is_finite() => width,
                    _ => return Err(LayoutError::MissingAvailableWidth),
                };
                if self.total_columns == 0 {
                    return Err(LayoutError::ZeroColumns);
                }
                Ok(available / self.total_columns as f64)
            }
        }
    }
}
