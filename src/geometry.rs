use serde::{Deserialize, Serialize};

/// Pixel-space sample of a pointer or scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axes {
    pub x_axis: f64,
    pub y_axis: f64,
}

impl Axes {
    pub const fn new(x_axis: f64, y_axis: f64) -> Self {
        Self { x_axis, y_axis }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Component-wise `self - earlier`.
    pub fn delta_since(&self, earlier: Axes) -> Axes {
        Axes::new(self.x_axis - earlier.x_axis, self.y_axis - earlier.y_axis)
    }
}

/// Absolute pixel box of an item inside the grid surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpan {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GridSpan {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}
