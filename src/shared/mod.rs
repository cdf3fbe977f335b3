//! Shared value types used across the window manager and persistence layers.

pub mod geometry;

pub use geometry::{Position, Size, Viewport};
