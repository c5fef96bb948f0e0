//! Interaction region model.
//!
//! Encapsulates the stick position, the movable/fixed center, and the
//! bounding radii, and enforces the clamp policy. The engine is the only
//! writer; the notifier and the rendering collaborator only read the
//! derived getters.
//!
//! The region is inert until the first [`InteractionRegion::resize`]
//! call announces the displayable size. Before that, updates are no-ops
//! and the derived getters return neutral values.

use tracing::{debug, trace};

use crate::config::{AxisLock, StickConfig};
use crate::geom::Vec2i;

/// Neutral normalized coordinate reported while the region is unsized.
const NORMALIZED_NEUTRAL: u8 = 50;

/// Position/center state of the stick within the widget.
#[derive(Debug, Clone, Default)]
pub struct InteractionRegion {
    /// Current stick contact point, clamped to the boundary circle.
    pos: Vec2i,
    /// Reference origin for angle/magnitude. Moves on touch-down in
    /// floating-center mode.
    center: Vec2i,
    /// Geometric view center; anchor for the background circle and the
    /// value `center` resets to on resize.
    fixed_center: Vec2i,
    /// Knob radius in pixels.
    button_radius: i32,
    /// Boundary circle radius in pixels.
    border_radius: i32,
    /// View extent as of the last resize.
    width: i32,
    height: i32,
}

impl InteractionRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute radii from the displayable size and reset all positions
    /// to the geometric center.
    ///
    /// Idempotent; called on every layout/rotation pass.
    pub fn resize(&mut self, width: u32, height: u32, config: &StickConfig) {
        let d = width.min(height) as f32;
        self.button_radius = (d / 2.0 * config.button_size_ratio) as i32;
        self.border_radius = (d / 2.0 * config.background_size_ratio) as i32;
        self.width = width as i32;
        self.height = height as i32;

        let center = Vec2i::new(self.width / 2, self.height / 2);
        self.fixed_center = center;
        self.center = center;
        self.pos = center;

        debug!(
            width,
            height,
            button_radius = self.button_radius,
            border_radius = self.border_radius,
            "Region resized"
        );
    }

    /// Whether the displayable size is known yet.
    pub fn is_sized(&self) -> bool {
        self.border_radius > 0
    }

    /// Record the first point of a new gesture.
    ///
    /// In floating-center mode the center snaps to the touch-down point
    /// (after axis locking against the previous center); in fixed-center
    /// mode this is identical to [`InteractionRegion::update`].
    pub fn begin_contact(&mut self, raw: Vec2i, config: &StickConfig) {
        if !self.is_sized() {
            return;
        }

        if !config.fixed_center {
            self.center = self.apply_axis_lock(raw, config.axis_lock);
        }
        self.update(raw, config);
    }

    /// Set the position from a raw pointer location and apply the clamp
    /// policy.
    pub fn update(&mut self, raw: Vec2i, config: &StickConfig) {
        if !self.is_sized() {
            return;
        }

        self.pos = self.apply_axis_lock(raw, config.axis_lock);
        self.clamp(config.stick_to_border);
    }

    /// Snap the position back to the center (auto-recenter on release).
    pub fn reset(&mut self) {
        self.pos = self.center;
    }

    /// Snap the center and position back to the geometric view center,
    /// used when re-entering fixed-center mode.
    pub fn recenter(&mut self) {
        self.center = self.fixed_center;
        self.pos = self.center;
    }

    fn apply_axis_lock(&self, raw: Vec2i, lock: AxisLock) -> Vec2i {
        match lock {
            AxisLock::Both => raw,
            AxisLock::Horizontal => Vec2i::new(raw.x, self.center.y),
            AxisLock::Vertical => Vec2i::new(self.center.x, raw.y),
        }
    }

    /// Constrain the position to the boundary circle, preserving
    /// direction from the center.
    ///
    /// Zero displacement never divides: the position is already at the
    /// center and stays there, stick-to-border included.
    fn clamp(&mut self, stick_to_border: bool) {
        let d = self.pos.distance_to(self.center);
        if d == 0.0 {
            return;
        }

        if d > self.border_radius as f64 || stick_to_border {
            let scale = self.border_radius as f64 / d;
            let dx = (self.pos.x - self.center.x) as f64;
            let dy = (self.pos.y - self.center.y) as f64;
            self.pos = Vec2i::new(
                (dx * scale).round() as i32 + self.center.x,
                (dy * scale).round() as i32 + self.center.y,
            );
            trace!(pos = ?self.pos, distance = d, "Clamped to boundary");
        }
    }

    /// Bearing of the stick in degrees, counterclockwise from the
    /// positive X axis with the screen Y axis inverted, in [0, 360).
    pub fn angle(&self) -> u16 {
        let dy = (self.center.y - self.pos.y) as f64;
        let dx = (self.pos.x - self.center.x) as f64;
        let mut deg = dy.atan2(dx).to_degrees().round() as i32;
        if deg < 0 {
            deg += 360;
        }
        (deg % 360) as u16
    }

    /// Displacement as an integer percentage of the boundary radius,
    /// saturating at 100.
    pub fn magnitude(&self) -> u8 {
        if !self.is_sized() {
            return 0;
        }
        let d = self.pos.distance_to(self.center);
        let pct = (100.0 * d / self.border_radius as f64).round() as i64;
        pct.clamp(0, 100) as u8
    }

    /// Horizontal position mapped linearly across the drawable extent
    /// into [0, 100]. Returns the neutral 50 while unsized.
    pub fn normalized_x(&self) -> u8 {
        Self::normalize_extent(self.pos.x, self.button_radius, self.width)
    }

    /// Vertical counterpart of [`InteractionRegion::normalized_x`].
    pub fn normalized_y(&self) -> u8 {
        Self::normalize_extent(self.pos.y, self.button_radius, self.height)
    }

    fn normalize_extent(coord: i32, button_radius: i32, extent: i32) -> u8 {
        let drawable = extent - 2 * button_radius;
        if drawable <= 0 {
            return NORMALIZED_NEUTRAL;
        }
        let pct = ((coord - button_radius) as f32 * 100.0 / drawable as f32).round() as i64;
        pct.clamp(0, 100) as u8
    }

    // Read accessors for the rendering collaborator

    pub fn position(&self) -> Vec2i {
        self.pos
    }

    pub fn center(&self) -> Vec2i {
        self.center
    }

    pub fn fixed_center(&self) -> Vec2i {
        self.fixed_center
    }

    pub fn button_radius(&self) -> i32 {
        self.button_radius
    }

    pub fn border_radius(&self) -> i32 {
        self.border_radius
    }
}
