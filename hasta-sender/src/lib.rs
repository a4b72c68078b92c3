//! Hasta sender - hand pose publisher
//!
//! Reads up to two tracked hands each frame, applies per-side calibration
//! offsets and sends one datagram to a fixed receiver.
//!
//! ## Components
//!
//! - [`PosePublisher`]: encodes and sends one datagram per tick (fire-and-forget)
//! - [`HandOffsets`]: per-side additive position offsets, adjustable at runtime
//! - [`TrackingSource`]: where poses come from ([`SimulatedHands`] when no
//!   tracker is attached)

pub mod config;
pub mod error;
pub mod offsets;
pub mod publisher;
pub mod tracking;

// Re-export commonly used types
pub use config::SenderConfig;
pub use error::{Error, Result};
pub use offsets::{Axis, HandOffsets, OffsetCommand};
pub use publisher::{PosePublisher, PublisherStats};
pub use tracking::{SimulatedHands, TrackingSource};
