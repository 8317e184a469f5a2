use thiserror::Error;

use crate::layout::ItemId;

/// Unified result type for the grid engine.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the grid engine.
///
/// Only configuration problems are errors. A move onto an occupied cell or a
/// duplicate add is a rejected operation and never reaches this type.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("fixed layout requires a non-zero slice width")]
    MissingSliceWidth,
    #[error("horizontally responsive layout requires a non-zero available width")]
    MissingAvailableWidth,
    #[error("horizontally responsive layout requires at least one column")]
    ZeroColumns,
    #[error("item `{id}` is invalid: {reason}")]
    InvalidItem { id: ItemId, reason: String },
    #[error("item `{0}` not found")]
    ItemNotFound(ItemId),
    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),
}
