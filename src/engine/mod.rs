//! Touch state machine.
//!
//! [`VirtualStick`] is the top-level controller: it ingests pointer
//! lifecycle events, owns the interaction region (single writer), runs
//! the periodic notifier while contact is held, and feeds pointer-count
//! transitions to the multi-press detector. Consumers take the output
//! channel once and drain it on their own context; the rendering
//! collaborator watches the redraw counter and reads the position
//! accessors.

mod gesture;
mod notifier;


use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, trace};

use crate::config::{AxisLock, ConfigError, StickConfig};
use crate::events::{PointerAction, PointerEvent, StickEvent};
use crate::geom::Vec2i;
use crate::region::InteractionRegion;

use gesture::MultiPressDetector;
use notifier::{Notifier, SharedRegion};

/// Virtual joystick input engine.
///
/// All mutation happens through `&mut self` on the owning context; the
/// notifier task only reads the shared region.
pub struct VirtualStick {
    config: StickConfig,
    region: SharedRegion,
    notifier: Notifier,
    multi_press: MultiPressDetector,
    output_tx: mpsc::UnboundedSender<StickEvent>,
    /// Held until the consumer takes it.
    output_rx: Option<mpsc::UnboundedReceiver<StickEvent>>,
    /// Frame counter bumped on every processed event.
    redraw_tx: watch::Sender<u64>,
    tracking: bool,
}

impl VirtualStick {
    /// Build an engine from a validated configuration.
    pub fn new(config: StickConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let region: SharedRegion = Arc::new(RwLock::new(InteractionRegion::new()));
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (redraw_tx, _) = watch::channel(0);

        info!(
            fixed_center = config.fixed_center,
            auto_recenter = config.auto_recenter,
            refresh_interval_ms = config.refresh_interval_ms,
            "Virtual stick engine created"
        );

        Ok(Self {
            notifier: Notifier::new(region.clone(), output_tx.clone()),
            multi_press: MultiPressDetector::new(output_tx.clone()),
            region,
            config,
            output_tx,
            output_rx: Some(output_rx),
            redraw_tx,
            tracking: false,
        })
    }

    /// Take the output channel. Single consumer; returns `None` after
    /// the first call.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<StickEvent>> {
        self.output_rx.take()
    }

    /// Take the output channel as a `Stream`.
    pub fn event_stream(&mut self) -> Option<UnboundedReceiverStream<StickEvent>> {
        self.take_events().map(UnboundedReceiverStream::new)
    }

    /// Redraw frame counter for the rendering collaborator. Bumped on
    /// every processed pointer event and on resize, independent of the
    /// notifier cadence.
    pub fn redraw_frames(&self) -> watch::Receiver<u64> {
        self.redraw_tx.subscribe()
    }

    /// Announce the displayable size. Safe to call repeatedly; pointer
    /// events arriving before the first call are processed against an
    /// inert region.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.region.write().resize(width, height, &self.config);
        self.request_redraw();
    }

    /// Ingest one pointer lifecycle event.
    ///
    /// Disabled engines swallow everything: no state mutation, no
    /// timers, no redraw.
    pub fn handle_event(&mut self, event: PointerEvent) {
        if !self.config.enabled {
            trace!(?event, "Engine disabled, event swallowed");
            return;
        }

        match event.action {
            PointerAction::Down => {
                debug!(pos = ?event.position, "Tracking started");
                self.tracking = true;
                self.region.write().begin_contact(event.position, &self.config);
                // The notifier's leading tick is the immediate output
                // for the down transition
                self.notifier
                    .start(Duration::from_millis(self.config.refresh_interval_ms));
                self.multi_press
                    .on_pointer_count_changed(event.pointer_count, &self.config.multi_press);
            }
            PointerAction::Move => {
                if !self.tracking {
                    trace!("Move while idle ignored");
                    return;
                }
                self.region.write().update(event.position, &self.config);
                self.multi_press.on_move();
                // Continuous push when nothing recenters the stick for
                // the consumer; otherwise the timer path delivers
                if !self.config.auto_recenter {
                    self.emit_move();
                }
            }
            PointerAction::Up => {
                debug!("Tracking stopped");
                self.tracking = false;
                self.notifier.stop();
                self.multi_press
                    .on_pointer_count_changed(event.pointer_count, &self.config.multi_press);
                if self.config.auto_recenter {
                    self.region.write().reset();
                    self.emit_move();
                }
            }
            PointerAction::SecondaryDown | PointerAction::SecondaryUp => {
                self.multi_press
                    .on_pointer_count_changed(event.pointer_count, &self.config.multi_press);
            }
        }

        self.request_redraw();
    }

    fn emit_move(&self) {
        let (angle, magnitude) = {
            let region = self.region.read();
            (region.angle(), region.magnitude())
        };
        let _ = self.output_tx.send(StickEvent::Move { angle, magnitude });
    }

    fn request_redraw(&self) {
        self.redraw_tx.send_modify(|frame| *frame += 1);
    }

    // Query accessors

    pub fn angle(&self) -> u16 {
        self.region.read().angle()
    }

    pub fn magnitude(&self) -> u8 {
        self.region.read().magnitude()
    }

    /// Horizontal position in [0, 100] across the drawable extent.
    pub fn normalized_x(&self) -> u8 {
        self.region.read().normalized_x()
    }

    /// Vertical position in [0, 100] across the drawable extent.
    pub fn normalized_y(&self) -> u8 {
        self.region.read().normalized_y()
    }

    pub fn position(&self) -> Vec2i {
        self.region.read().position()
    }

    pub fn center(&self) -> Vec2i {
        self.region.read().center()
    }

    pub fn button_radius(&self) -> i32 {
        self.region.read().button_radius()
    }

    pub fn border_radius(&self) -> i32 {
        self.region.read().border_radius()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &StickConfig {
        &self.config
    }

    // Runtime configuration

    /// Enable or disable the engine. Disabling mid-gesture tears down
    /// the notifier and any pending gesture timer.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled && !enabled {
            self.notifier.stop();
            self.multi_press.cancel();
            self.tracking = false;
        }
        self.config.enabled = enabled;
    }

    pub fn set_auto_recenter(&mut self, auto_recenter: bool) {
        self.config.auto_recenter = auto_recenter;
    }

    pub fn set_stick_to_border(&mut self, stick_to_border: bool) {
        self.config.stick_to_border = stick_to_border;
    }

    pub fn set_axis_lock(&mut self, axis_lock: AxisLock) {
        self.config.axis_lock = axis_lock;
    }

    /// Switch between fixed and floating center. Re-entering fixed mode
    /// snaps the center back to the geometric view center.
    pub fn set_fixed_center(&mut self, fixed: bool) {
        if fixed {
            self.region.write().recenter();
            self.request_redraw();
        }
        self.config.fixed_center = fixed;
    }

    /// Update the knob size ratio; invalid values are refused and take
    /// effect only at the next resize either way.
    pub fn set_button_size_ratio(&mut self, ratio: f32) -> bool {
        self.config.set_button_size_ratio(ratio)
    }

    /// Update the boundary size ratio; invalid values are refused and
    /// take effect only at the next resize either way.
    pub fn set_background_size_ratio(&mut self, ratio: f32) -> bool {
        self.config.set_background_size_ratio(ratio)
    }

    /// Update the notifier interval. Applies from the next tracking
    /// session; zero is refused.
    pub fn set_refresh_interval_ms(&mut self, interval_ms: u64) -> bool {
        if interval_ms == 0 {
            tracing::warn!("Rejected zero refresh interval");
            return false;
        }
        self.config.refresh_interval_ms = interval_ms;
        true
    }
}
