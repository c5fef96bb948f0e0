//! Pointer event ingestion and output signal types.
//!
//! The engine consumes [`PointerEvent`]s from the platform shell and
//! emits [`StickEvent`]s on a single ordered channel. Consumers either
//! drain the channel themselves or implement [`OutputSink`] and let
//! [`dispatch_outputs`] marshal delivery into their own task; the
//! notifier's timer task never invokes consumer code directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::geom::Vec2i;

/// Pointer lifecycle kinds delivered by the platform shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAction {
    /// First contact of a gesture.
    Down,
    /// Any pointer moved.
    Move,
    /// Last contact released.
    Up,
    /// An additional pointer touched down.
    SecondaryDown,
    /// An additional pointer lifted.
    SecondaryUp,
}

/// One touch event in view-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    /// Primary pointer position.
    pub position: Vec2i,
    /// Live pointer count after this event.
    pub pointer_count: u8,
}

impl PointerEvent {
    pub fn new(action: PointerAction, position: Vec2i, pointer_count: u8) -> Self {
        Self {
            action,
            position,
            pointer_count,
        }
    }

    /// Primary touch-down with a single pointer.
    pub fn down(position: Vec2i) -> Self {
        Self::new(PointerAction::Down, position, 1)
    }

    pub fn moved(position: Vec2i, pointer_count: u8) -> Self {
        Self::new(PointerAction::Move, position, pointer_count)
    }

    /// Last contact released.
    pub fn up(position: Vec2i) -> Self {
        Self::new(PointerAction::Up, position, 0)
    }

    pub fn secondary_down(position: Vec2i, pointer_count: u8) -> Self {
        Self::new(PointerAction::SecondaryDown, position, pointer_count)
    }

    pub fn secondary_up(position: Vec2i, pointer_count: u8) -> Self {
        Self::new(PointerAction::SecondaryUp, position, pointer_count)
    }
}

/// Derived output delivered to the registered consumer.
///
/// Immediate emissions and notifier ticks share one channel, so
/// consumers observe them in event order with no cross-path reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StickEvent {
    /// Directional signal: angle in [0, 360) degrees, magnitude in
    /// [0, 100] percent of the boundary radius.
    Move { angle: u16, magnitude: u8 },
    /// Two-finger long press fired.
    MultiPress,
}

/// Consumer-side sink for stick output.
///
/// Note: methods take `&mut self`. The sink runs on the consumer's own
/// task, which is the single place its state mutates.
#[async_trait]
pub trait OutputSink: Send {
    /// Directional signal update.
    async fn on_move(&mut self, angle: u16, magnitude: u8);

    /// Two-finger long press.
    ///
    /// Default implementation: no-op (not every consumer binds the
    /// secondary trigger).
    async fn on_multi_press(&mut self) {}
}

/// Drain the output channel into a sink until the engine is dropped.
///
/// Spawn this on the context that owns the consumer's state; it is the
/// marshalling point between the engine's background tasks and the
/// consumer.
pub async fn dispatch_outputs<S: OutputSink>(
    mut rx: mpsc::UnboundedReceiver<StickEvent>,
    mut sink: S,
) {
    while let Some(event) = rx.recv().await {
        match event {
            StickEvent::Move { angle, magnitude } => sink.on_move(angle, magnitude).await,
            StickEvent::MultiPress => sink.on_multi_press().await,
        }
    }
    debug!("Output channel closed, dispatch loop terminated");
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingSink {
        moves: Arc<Mutex<Vec<(u16, u8)>>>,
        presses: Arc<Mutex<u32>>,
    }

    #[async_trait]
    impl OutputSink for RecordingSink {
        async fn on_move(&mut self, angle: u16, magnitude: u8) {
            self.moves.lock().push((angle, magnitude));
        }

        async fn on_multi_press(&mut self) {
            *self.presses.lock() += 1;
        }
    }

    #[tokio::test]
    async fn test_dispatch_preserves_order() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(StickEvent::Move { angle: 0, magnitude: 10 }).unwrap();
        tx.send(StickEvent::MultiPress).unwrap();
        tx.send(StickEvent::Move { angle: 90, magnitude: 50 }).unwrap();
        drop(tx);

        let sink = RecordingSink::default();
        // Sender dropped: the loop drains what was queued and returns
        dispatch_outputs(rx, sink.clone()).await;

        assert_eq!(*sink.moves.lock(), vec![(0, 10), (90, 50)]);
        assert_eq!(*sink.presses.lock(), 1);
    }

    #[test]
    fn test_pointer_event_serde() {
        let event = PointerEvent::down(Vec2i::new(10, 20));
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.pointer_count, 1);
    }
}
