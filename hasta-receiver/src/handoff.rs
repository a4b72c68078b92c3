//! Single-slot hand-off between the receive thread and the consumer tick
//!
//! Last value wins. [`HandoffSlot::publish`] replaces whatever is waiting,
//! [`HandoffSlot::take`] empties the slot. There is no queue, so a slow
//! consumer never builds a backlog; it just skips to the newest snapshot.
//!
//! Two flags mirror the slot for lock-free polling:
//!
//! | Flag | Set when | Cleared when |
//! |------|----------|--------------|
//! | `update_pending` | a frame with hands is published | taken, or replaced by an empty frame |
//! | `clear_pending` | a sentinel frame is published | taken, or replaced by a frame with hands |
//!
//! Flags are only written while the slot lock is held, so they always agree
//! with the slot contents.

use hasta_wire::FrameMessage;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Latest decoded frame waiting for the consumer
#[derive(Debug, Default)]
pub struct HandoffSlot {
    latest: Mutex<Option<FrameMessage>>,
    update_pending: AtomicBool,
    clear_pending: AtomicBool,
    /// Frames replaced before the consumer saw them
    overwritten: AtomicU64,
}

impl HandoffSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `frame`, replacing any unconsumed one.
    pub fn publish(&self, frame: FrameMessage) {
        let mut latest = self.latest.lock();
        if latest.is_some() {
            self.overwritten.fetch_add(1, Ordering::Relaxed);
        }

        let clear = frame.is_empty();
        *latest = Some(frame);
        self.clear_pending.store(clear, Ordering::Release);
        self.update_pending.store(!clear, Ordering::Release);
    }

    /// Take the newest frame, if any arrived since the last call.
    pub fn take(&self) -> Option<FrameMessage> {
        if !self.has_pending() {
            return None;
        }

        let mut latest = self.latest.lock();
        self.update_pending.store(false, Ordering::Release);
        self.clear_pending.store(false, Ordering::Release);
        latest.take()
    }

    /// A frame is waiting. Does not lock.
    pub fn has_pending(&self) -> bool {
        self.update_pending.load(Ordering::Acquire) || self.clear_pending.load(Ordering::Acquire)
    }

    pub fn update_pending(&self) -> bool {
        self.update_pending.load(Ordering::Acquire)
    }

    pub fn clear_pending(&self) -> bool {
        self.clear_pending.load(Ordering::Acquire)
    }

    /// Frames dropped because a newer one replaced them.
    pub fn overwritten(&self) -> u64 {
        self.overwritten.load(Ordering::Relaxed)
    }
}
