//! Hasta receiver - reconstructs remote hands from pose datagrams
//!
//! ## Thread Model
//!
//! ```text
//! ┌──────────────────┐  publish   ┌─────────────┐  take   ┌──────────────────┐
//! │  pose-receiver   │ ─────────▶ │ HandoffSlot │ ──────▶ │ consumer tick    │
//! │ (blocking recv)  │ overwrite  │ (one frame) │  poll   │ HandReconciler   │
//! └──────────────────┘            └─────────────┘         │ → HandRenderer   │
//!                                                         └──────────────────┘
//! ```
//!
//! The receive thread never touches the renderer. It decodes each datagram
//! and overwrites the slot; the consumer tick takes whatever is newest and
//! reconciles the per-side hand state against it. Datagrams that arrive
//! between two ticks are dropped, which is fine because each one is a full
//! snapshot.

pub mod config;
pub mod error;
pub mod handoff;
pub mod receiver;
pub mod reconcile;
pub mod renderer;

// Re-export commonly used types
pub use config::ReceiverConfig;
pub use error::{Error, Result};
pub use handoff::HandoffSlot;
pub use receiver::{PoseReceiver, ReceiverStats, StatsSnapshot};
pub use reconcile::{HandReconciler, HandState, ReconcileReport, Transition};
pub use renderer::{HandRenderer, LogRenderer};
