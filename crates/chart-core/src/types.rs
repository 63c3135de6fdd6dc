// File: crates/chart-core/src/types.rs
// Summary: Shared geometry types (viewport size, margins, plot area).

use serde::{Deserialize, Serialize};

/// Default viewport width in pixels.
pub const WIDTH: u32 = 1024;
/// Default viewport height in pixels.
pub const HEIGHT: u32 = 640;

/// Outer drawing surface size, supplied by the renderer on resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Plot area left after removing `insets`. Never narrower than one pixel.
    pub fn plot_area(&self, insets: &Insets) -> PlotArea {
        let width = self.width.saturating_sub(insets.hsum()).max(1);
        let height = self.height.saturating_sub(insets.vsum()).max(1);
        PlotArea { width: width as f64, height: height as f64 }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

/// Screen margins, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    pub const fn uniform(px: u32) -> Self {
        Self::new(px, px, px, px)
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left.saturating_add(self.right) }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top.saturating_add(self.bottom) }
}

impl Default for Insets {
    fn default() -> Self {
        Self::uniform(50)
    }
}

/// Inner plot size. Coordinates handed to and from the core are relative to its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}
