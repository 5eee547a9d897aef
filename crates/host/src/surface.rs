use preview_composer::HeightBounds;
use serde::Serialize;

/// The visible element hosting the sandboxed document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    bounds: HeightBounds,
    width: f64,
    height: f64,
}

impl Surface {
    pub fn new(bounds: HeightBounds, width: f64) -> Self {
        Self {
            bounds,
            width,
            height: bounds.min,
        }
    }

    /// Clamp a reported height and apply it; returns the applied value
    pub fn apply_height(&mut self, reported: f64) -> f64 {
        self.height = self.bounds.clamp(reported);
        self.height
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn bounds(&self) -> HeightBounds {
        self.bounds
    }
}
