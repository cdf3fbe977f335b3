//! Desktop geometry value types
//!
//! Plain Copy structs shared by the window manager, the placement helpers,
//! and the layout wire format. Coordinates are in desktop space: `x` grows
//! right, `y` grows down, and positions may go negative or past the viewport
//! transiently while a window is being dragged.

use serde::{Deserialize, Serialize};

/// Top-left coordinate of a window in desktop space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Window dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Desktop viewport dimensions
///
/// Read-only input to the placement helpers; refreshed on resize events
/// outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
