//! Shared numeric constants for the canvas engine.

use std::time::Duration;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for thin lines and path points.
pub const HIT_THRESHOLD_PX: f64 = 5.0;

/// Padding added around a selection's bounding box, in pixels.
pub const BOX_PADDING_PX: f64 = 5.0;

/// Slop around the selection box border for border-drag pickup, in pixels.
pub const BORDER_THRESHOLD_PX: f64 = 5.0;

// ── Drawing ─────────────────────────────────────────────────────

/// Minimum distance between consecutive freehand path samples, in pixels.
pub const PATH_SAMPLE_MIN_DIST_PX: f64 = 3.0;

/// Radius of the eraser circle, in pixels.
pub const ERASER_RADIUS_PX: f64 = 10.0;

/// Default stroke color for new objects.
pub const DEFAULT_STROKE_COLOR: &str = "#4a9eff";

/// Default stroke width for new objects, in pixels.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

// ── Sync ────────────────────────────────────────────────────────

/// Period between reconciler polls of the server object list.
pub const SYNC_PERIOD: Duration = Duration::from_millis(2500);
