//! Two-finger long-press gesture detector.
//!
//! Recognizes a sustained two-finger contact independently of the
//! primary position tracking. Arming happens when the live pointer
//! count reaches exactly two; a timer task then fires the multi-press
//! event after twice the configured long-press threshold unless the
//! second pointer lifts first or the accumulated movement spends the
//! move budget.
//!
//! The fire is epoch-guarded: a timer that outraces its cancellation
//! discards the event instead of delivering it, so each armed cycle
//! fires at most once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::config::MultiPressConfig;
use crate::events::StickEvent;

pub(crate) struct MultiPressDetector {
    output_tx: mpsc::UnboundedSender<StickEvent>,
    /// Signalled (or dropped) to cancel the pending timer task.
    cancel_tx: Option<watch::Sender<bool>>,
    /// Arming epoch; a timer from a superseded epoch must not fire.
    epoch: Arc<AtomicU64>,
    armed: bool,
    /// Remaining qualifying move events before disarm.
    move_budget: u32,
}

impl MultiPressDetector {
    pub fn new(output_tx: mpsc::UnboundedSender<StickEvent>) -> Self {
        Self {
            output_tx,
            cancel_tx: None,
            epoch: Arc::new(AtomicU64::new(0)),
            armed: false,
            move_budget: 0,
        }
    }

    /// Track live pointer count transitions.
    ///
    /// Arms on the transition to exactly two pointers; disarms when the
    /// count drops below two. A third finger neither re-arms nor
    /// cancels a pending timer.
    pub fn on_pointer_count_changed(&mut self, count: u8, config: &MultiPressConfig) {
        if !config.enabled {
            return;
        }

        if count == 2 && !self.armed {
            self.arm(config);
        } else if count < 2 && self.armed {
            debug!("Second pointer lifted, multi-press disarmed");
            self.cancel();
        }
    }

    /// Count a qualifying move event against the budget.
    ///
    /// The budget-th move disarms the pending timer.
    pub fn on_move(&mut self) {
        if !self.armed {
            return;
        }

        self.move_budget = self.move_budget.saturating_sub(1);
        if self.move_budget == 0 {
            debug!("Move budget spent, multi-press disarmed");
            self.cancel();
        }
    }

    /// Disarm and cancel any pending timer.
    pub fn cancel(&mut self) {
        self.armed = false;
        if let Some(cancel) = self.cancel_tx.take() {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            let _ = cancel.send(true);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    fn arm(&mut self, config: &MultiPressConfig) {
        self.cancel();
        self.armed = true;
        self.move_budget = config.move_budget;

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        self.cancel_tx = Some(cancel_tx);

        // Twice the single long-press threshold
        let delay = Duration::from_millis(config.long_press_timeout_ms * 2);
        let live_epoch = self.epoch.clone();
        let output_tx = self.output_tx.clone();

        debug!(delay_ms = delay.as_millis() as u64, "Multi-press armed");

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if live_epoch.load(Ordering::SeqCst) == epoch {
                        trace!(epoch, "Multi-press fired");
                        let _ = output_tx.send(StickEvent::MultiPress);
                    }
                }
                _ = cancel_rx.changed() => {
                    trace!(epoch, "Multi-press timer cancelled");
                }
            }
        });
    }
}

impl Drop for MultiPressDetector {
    fn drop(&mut self) {
        self.cancel();
    }
}
