//! Touch-to-signal input engine for an on-screen virtual joystick.
//!
//! Converts raw pointer (touch) events into a continuous directional
//! signal (angle in [0, 360) degrees, magnitude in [0, 100] percent of
//! the boundary radius) for a remote device to consume. While
//! contact is held, a periodic background notifier pushes the signal at
//! a configurable interval; a concurrent detector recognizes a
//! sustained two-finger press as a secondary command trigger.
//!
//! Rendering, platform event dispatch, and transport are external
//! collaborators: the platform shell feeds [`PointerEvent`]s and sizing
//! into [`VirtualStick`], the renderer reads the position accessors and
//! watches the redraw counter, and the signal consumer drains the
//! output channel on its own task.
//!
//! ```no_run
//! use touchstick::{PointerEvent, StickConfig, StickEvent, VirtualStick};
//! use touchstick::geom::Vec2i;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut stick = VirtualStick::new(StickConfig::default()).unwrap();
//! let mut events = stick.take_events().unwrap();
//!
//! stick.resize(300, 300);
//! stick.handle_event(PointerEvent::down(Vec2i::new(220, 150)));
//!
//! if let Some(StickEvent::Move { angle, magnitude }) = events.recv().await {
//!     println!("angle={angle} magnitude={magnitude}");
//! }
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod events;
pub mod geom;
pub mod haptics;
pub mod orientation;
pub mod region;

pub use config::{AxisLock, ConfigError, MultiPressConfig, StickConfig};
pub use engine::VirtualStick;
pub use events::{dispatch_outputs, OutputSink, PointerAction, PointerEvent, StickEvent};
pub use geom::{Vec2f, Vec2i};
pub use region::InteractionRegion;
