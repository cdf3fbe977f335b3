//! Placement Module
//!
//! Bulk window arrangement (cascade, tile) and drag-time geometry helpers
//! (viewport constraint, edge snapping). All functions are pure: they take
//! window records plus the viewport and return new data for the caller to
//! apply through the window manager, never mutating state in place.

use crate::config::PlacementConfig;
use crate::shared::{Position, Size, Viewport};
use crate::wm::Window;

/// Arrange windows in a diagonal cascade
///
/// Positions are reassigned in array order from the configured start point,
/// ignoring current positions entirely; every window is un-maximised. The
/// viewport is accepted for symmetry with [`tile_windows`] but the cascade is
/// not bounded by it, so a long cascade can run past the edge. Callers that
/// care run [`constrain_to_viewport`] afterwards.
pub fn cascade_windows(
    windows: &[Window],
    _viewport: Viewport,
    config: &PlacementConfig,
) -> Vec<Window> {
    windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let offset = i as i32 * config.cascade_offset;
            let mut window = window.clone();
            window.position = Position::new(
                config.cascade_start_x + offset,
                config.cascade_start_y + offset,
            );
            window.is_maximised = false;
            window
        })
        .collect()
}

/// Arrange windows in a near-square grid
///
/// Grid shape is `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`; cells are
/// assigned row-major in array order. The viewport area minus the chrome and
/// dock strips is divided evenly with `tile_padding` gaps, so every window
/// ends up the same size, un-maximised. Empty input is returned unchanged.
pub fn tile_windows(
    windows: &[Window],
    viewport: Viewport,
    config: &PlacementConfig,
) -> Vec<Window> {
    if windows.is_empty() {
        return Vec::new();
    }

    let count = windows.len() as u32;
    let cols = (count as f64).sqrt().ceil() as u32;
    let rows = count.div_ceil(cols);
    let pad = config.tile_padding;

    let avail_width = viewport.width.saturating_sub((cols + 1) * pad);
    let avail_height = viewport
        .height
        .saturating_sub(config.top_chrome + config.dock_height)
        .saturating_sub((rows + 1) * pad);
    let cell_width = (avail_width / cols).max(1);
    let cell_height = (avail_height / rows).max(1);

    windows
        .iter()
        .enumerate()
        .map(|(i, window)| {
            let row = i as u32 / cols;
            let col = i as u32 % cols;
            let mut window = window.clone();
            window.position = Position::new(
                (pad + col * (cell_width + pad)) as i32,
                (config.top_chrome + pad + row * (cell_height + pad)) as i32,
            );
            window.size = Size::new(cell_width, cell_height);
            window.is_maximised = false;
            window
        })
        .collect()
}

/// Clamp a window's position so it stays reachable
///
/// At least `min_visible` pixels of the window remain inside the viewport on
/// every edge. The chrome strip at the top and the dock strip at the bottom
/// are never valid resting positions.
pub fn constrain_to_viewport(
    position: Position,
    size: Size,
    viewport: Viewport,
    config: &PlacementConfig,
) -> Position {
    let min_visible = config.min_visible as i32;

    let min_x = min_visible - size.width as i32;
    let max_x = viewport.width as i32 - min_visible;
    let min_y = config.top_chrome as i32;
    let max_y = viewport.height as i32 - config.dock_height as i32 - min_visible;

    // A viewport smaller than the visibility margins would invert the clamp
    // ranges; collapse each range instead of panicking
    Position::new(
        position.x.clamp(min_x.min(max_x), max_x),
        position.y.clamp(min_y, max_y.max(min_y)),
    )
}

/// Snap a dragged position to the left, right, or top viewport edge
///
/// Within `snap_threshold` pixels of an edge the position is rounded exactly
/// onto it; otherwise it is returned unchanged. The top edge is the bottom of
/// the chrome strip, and there is no bottom snap (the dock occupies that
/// space).
pub fn snap_to_edges(
    position: Position,
    size: Size,
    viewport: Viewport,
    config: &PlacementConfig,
) -> Position {
    let threshold = config.snap_threshold;
    let mut snapped = position;

    if position.x.abs() <= threshold {
        snapped.x = 0;
    } else {
        let right_edge = viewport.width as i32 - size.width as i32;
        if (position.x - right_edge).abs() <= threshold {
            snapped.x = right_edge;
        }
    }

    let top_edge = config.top_chrome as i32;
    if (position.y - top_edge).abs() <= threshold {
        snapped.y = top_edge;
    }

    snapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::{apps::AppId, WindowManager};
    use std::collections::HashSet;

    fn open_windows(count: usize) -> Vec<Window> {
        let mut wm = WindowManager::default();
        let apps = [
            AppId::Dashboard,
            AppId::Intel,
            AppId::Pitch,
            AppId::Tracker,
            AppId::Studio,
            AppId::Community,
            AppId::Autopilot,
        ];
        for app in apps.iter().take(count) {
            wm.open_app(*app, None, None);
        }
        wm.state().windows.clone()
    }

    #[test]
    fn test_cascade_is_deterministic_diagonal() {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(1920, 1080);
        let mut windows = open_windows(3);
        windows[1].is_maximised = true;
        // Current positions must not influence the cascade
        windows[2].position = Position::new(-400, 5000);

        let arranged = cascade_windows(&windows, viewport, &config);
        for (i, window) in arranged.iter().enumerate() {
            let offset = i as i32 * config.cascade_offset;
            assert_eq!(
                window.position,
                Position::new(config.cascade_start_x + offset, config.cascade_start_y + offset)
            );
            assert!(!window.is_maximised);
        }
    }

    #[test]
    fn test_tile_assigns_unique_cells_with_positive_sizes() {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(1920, 1080);

        for count in 1..=7 {
            let windows = open_windows(count);
            let tiled = tile_windows(&windows, viewport, &config);
            assert_eq!(tiled.len(), count);

            let cols = (count as f64).sqrt().ceil() as usize;
            let cells: HashSet<(usize, usize)> =
                (0..count).map(|i| (i / cols, i % cols)).collect();
            assert_eq!(cells.len(), count);

            let positions: HashSet<(i32, i32)> = tiled
                .iter()
                .map(|w| (w.position.x, w.position.y))
                .collect();
            assert_eq!(positions.len(), count, "tiled windows overlap");

            for window in &tiled {
                assert!(window.size.width > 0);
                assert!(window.size.height > 0);
                assert!(!window.is_maximised);
                assert!(window.position.y >= config.top_chrome as i32);
            }

            // All cells share one size
            let first = tiled[0].size;
            assert!(tiled.iter().all(|w| w.size == first));
        }
    }

    #[test]
    fn test_tile_empty_is_noop() {
        let config = PlacementConfig::default();
        let tiled = tile_windows(&[], Viewport::new(1920, 1080), &config);
        assert!(tiled.is_empty());
    }

    #[test]
    fn test_constrain_keeps_minimum_visible_margin() {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(1920, 1080);
        let size = Size::new(800, 600);

        // Dragged far off the left edge
        let p = constrain_to_viewport(Position::new(-2000, 500), size, viewport, &config);
        assert_eq!(p.x, config.min_visible as i32 - 800);

        // Dragged far off the right edge
        let p = constrain_to_viewport(Position::new(5000, 500), size, viewport, &config);
        assert_eq!(p.x, 1920 - config.min_visible as i32);

        // Never rests under the top chrome
        let p = constrain_to_viewport(Position::new(100, -300), size, viewport, &config);
        assert_eq!(p.y, config.top_chrome as i32);

        // Never rests inside the dock strip
        let p = constrain_to_viewport(Position::new(100, 3000), size, viewport, &config);
        assert_eq!(
            p.y,
            1080 - config.dock_height as i32 - config.min_visible as i32
        );

        // In-bounds positions pass through unchanged
        let inside = Position::new(400, 300);
        assert_eq!(constrain_to_viewport(inside, size, viewport, &config), inside);
    }

    #[test]
    fn test_constrain_degenerate_viewport_does_not_panic() {
        let config = PlacementConfig::default();
        // Narrower than the visibility margins on both axes
        let viewport = Viewport::new(50, 60);
        let size = Size::new(40, 600);

        let p = constrain_to_viewport(Position::new(0, 100), size, viewport, &config);
        assert_eq!(p.x, viewport.width as i32 - config.min_visible as i32);
        assert_eq!(p.y, config.top_chrome as i32);

        let p = constrain_to_viewport(Position::new(-500, -500), size, viewport, &config);
        assert!(p.x <= viewport.width as i32 - config.min_visible as i32);
        assert_eq!(p.y, config.top_chrome as i32);
    }

    #[test]
    fn test_snap_to_left_right_and_top_edges() {
        let config = PlacementConfig::default();
        let viewport = Viewport::new(1920, 1080);
        let size = Size::new(800, 600);

        // Left
        let p = snap_to_edges(Position::new(9, 400), size, viewport, &config);
        assert_eq!(p.x, 0);

        // Right: window right edge lands on the viewport right edge
        let p = snap_to_edges(Position::new(1920 - 800 - 10, 400), size, viewport, &config);
        assert_eq!(p.x, 1920 - 800);

        // Top is chrome-aware
        let near_top = config.top_chrome as i32 + 5;
        let p = snap_to_edges(Position::new(500, near_top), size, viewport, &config);
        assert_eq!(p.y, config.top_chrome as i32);

        // Outside the threshold nothing moves
        let free = Position::new(500, 400);
        assert_eq!(snap_to_edges(free, size, viewport, &config), free);

        // No bottom snap
        let near_dock = Position::new(500, 1080 - config.dock_height as i32 - 600);
        assert_eq!(snap_to_edges(near_dock, size, viewport, &config), near_dock);
    }
}
