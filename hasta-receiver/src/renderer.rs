//! Rendering collaborator interface

use hasta_wire::{Quat, Side, Vec3};

/// Creates, moves and destroys renderable hand objects.
///
/// Called only from the consumer tick, never from the receive thread, so
/// implementations may be bound to a single "main" thread.
pub trait HandRenderer {
    /// Owned reference to one renderable hand.
    type Handle;

    /// Instantiate a hand for `side`.
    fn create_hand(&mut self, side: Side) -> Self::Handle;

    /// Set the hand's transform.
    fn update_hand(&mut self, handle: &mut Self::Handle, position: Vec3, orientation: Quat);

    /// Destroy the hand. The handle is consumed.
    fn destroy_hand(&mut self, handle: Self::Handle);
}

/// Handle issued by [`LogRenderer`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedHand {
    pub id: u64,
    pub side: Side,
    pub position: Vec3,
    pub orientation: Quat,
}

/// Renderer for headless runs: logs every lifecycle event.
#[derive(Debug, Default)]
pub struct LogRenderer {
    next_id: u64,
    live: usize,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands currently instantiated
    pub fn live(&self) -> usize {
        self.live
    }
}

impl HandRenderer for LogRenderer {
    type Handle = LoggedHand;

    fn create_hand(&mut self, side: Side) -> LoggedHand {
        self.next_id += 1;
        self.live += 1;
        log::info!("Created {} hand #{}", side, self.next_id);
        LoggedHand {
            id: self.next_id,
            side,
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }

    fn update_hand(&mut self, handle: &mut LoggedHand, position: Vec3, orientation: Quat) {
        handle.position = position;
        handle.orientation = orientation;
        log::trace!(
            "{} hand #{} at {} rot {}",
            handle.side,
            handle.id,
            position,
            orientation
        );
    }

    fn destroy_hand(&mut self, handle: LoggedHand) {
        self.live = self.live.saturating_sub(1);
        log::info!(
            "Destroyed {} hand #{} (last at {})",
            handle.side,
            handle.id,
            handle.position
        );
    }
}
