//! Periodic output notifier.
//!
//! While contact is held, a single repeating background task computes
//! `(angle, magnitude)` from the shared region at a fixed interval and
//! pushes it into the ordered output channel. The task only reads the
//! region; all mutation stays with the engine.
//!
//! Start is an idempotent restart and stop is safe from any execution
//! context. A generation counter guarantees that no two notifier tasks
//! for the same handle ever emit concurrently, even across a rapid
//! stop/start: a task from a superseded generation drops its tick
//! instead of sending it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::events::StickEvent;
use crate::region::InteractionRegion;

/// Region shared between the engine (writer) and the notifier (reader).
pub(crate) type SharedRegion = Arc<RwLock<InteractionRegion>>;

/// Repeating background emitter for the directional signal.
pub(crate) struct Notifier {
    region: SharedRegion,
    output_tx: mpsc::UnboundedSender<StickEvent>,
    /// Dropping or signalling this cancels the running task.
    cancel_tx: Option<watch::Sender<bool>>,
    /// Live generation; a task whose generation is older stops emitting.
    generation: Arc<AtomicU64>,
}

impl Notifier {
    pub fn new(region: SharedRegion, output_tx: mpsc::UnboundedSender<StickEvent>) -> Self {
        Self {
            region,
            output_tx,
            cancel_tx: None,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Spawn the repeating task, cancelling any prior one first.
    pub fn start(&mut self, interval: Duration) {
        self.stop();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        self.cancel_tx = Some(cancel_tx);

        let region = self.region.clone();
        let output_tx = self.output_tx.clone();
        let live_generation = self.generation.clone();

        tokio::spawn(async move {
            debug!(
                generation,
                interval_ms = interval.as_millis() as u64,
                "Notifier task started"
            );

            loop {
                let (angle, magnitude) = {
                    let region = region.read();
                    (region.angle(), region.magnitude())
                };

                // A superseded task must not interleave with its
                // replacement
                if live_generation.load(Ordering::SeqCst) != generation {
                    break;
                }

                if output_tx
                    .send(StickEvent::Move { angle, magnitude })
                    .is_err()
                {
                    debug!(generation, "Output receiver dropped, notifier exiting");
                    break;
                }

                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    // Cancelled, or the handle itself was dropped
                    _ = cancel_rx.changed() => break,
                }
            }

            trace!(generation, "Notifier task terminated");
        });
    }

    /// Request cancellation.
    ///
    /// Observed within one interval; the generation bump suppresses any
    /// tick that races past the watch signal.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel_tx.take() {
            self.generation.fetch_add(1, Ordering::SeqCst);
            let _ = cancel.send(true);
            debug!("Notifier stop requested");
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel_tx.is_some()
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StickConfig;
    use crate::geom::Vec2i;

    fn make_notifier() -> (Notifier, mpsc::UnboundedReceiver<StickEvent>, SharedRegion) {
        let config = StickConfig {
            background_size_ratio: 1.0,
            ..StickConfig::default()
        };
        let mut region = InteractionRegion::new();
        region.resize(200, 200, &config);
        region.update(Vec2i::new(200, 100), &config);

        let region = Arc::new(RwLock::new(region));
        let (tx, rx) = mpsc::unbounded_channel();
        (Notifier::new(region.clone(), tx), rx, region)
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_current_state_each_tick() {
        let (mut notifier, mut rx, region) = make_notifier();
        notifier.start(Duration::from_millis(10));

        let first = rx.recv().await.unwrap();
        assert_eq!(first, StickEvent::Move { angle: 0, magnitude: 100 });

        // Mutate the region between ticks; the next tick reflects it
        {
            let config = StickConfig {
                background_size_ratio: 1.0,
                ..StickConfig::default()
            };
            region.write().update(Vec2i::new(100, 50), &config);
        }
        let second = rx.recv().await.unwrap();
        assert_eq!(second, StickEvent::Move { angle: 90, magnitude: 50 });

        notifier.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_within_one_interval() {
        let (mut notifier, mut rx, _region) = make_notifier();
        notifier.start(Duration::from_millis(10));

        let _ = rx.recv().await.unwrap();
        notifier.stop();
        assert!(!notifier.is_active());

        // Drain anything that was already queued, then verify silence
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_single_live_task() {
        let (mut notifier, mut rx, _region) = make_notifier();

        notifier.start(Duration::from_millis(1000));
        let _ = rx.recv().await.unwrap();

        notifier.start(Duration::from_millis(1000));
        let _ = rx.recv().await.unwrap();

        // Over the next interval, exactly one tick arrives: the
        // superseded task is gone
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 1);

        notifier.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_task() {
        let (mut notifier, mut rx, _region) = make_notifier();
        notifier.start(Duration::from_millis(10));
        let _ = rx.recv().await.unwrap();

        drop(notifier);
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
