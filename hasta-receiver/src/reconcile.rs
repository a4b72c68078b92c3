//! Per-side hand lifecycle
//!
//! Each side is an independent two-state machine driven by decoded frames:
//!
//! | From | Frame has side? | To | Renderer calls |
//! |------|-----------------|----|----------------|
//! | Absent | yes | Present | `create_hand`, `update_hand` |
//! | Present | yes | Present | `update_hand` |
//! | Present | no | Absent | `destroy_hand` |
//! | Absent | no | Absent | none |
//!
//! An empty frame (sentinel) therefore destroys whatever exists and leaves
//! absent sides alone. Present sides are handled before absent ones, so a
//! frame that swaps hands creates the new one before destroying the old.
//!
//! Hands only disappear when a frame omits them. If datagrams stop arriving
//! the hands keep their last pose indefinitely.

use crate::renderer::HandRenderer;
use hasta_wire::{FrameMessage, HandPose, Side};

/// Whether a side currently has a renderable hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandState {
    Absent,
    Present,
}

/// What one frame did to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Absent -> Absent
    #[default]
    None,
    /// Absent -> Present
    Created,
    /// Present -> Present
    Updated,
    /// Present -> Absent
    Destroyed,
}

/// Per-side transitions from one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    transitions: [Transition; 2],
}

impl ReconcileReport {
    pub fn transition(&self, side: Side) -> Transition {
        self.transitions[side.index()]
    }

    /// True if no hand was created or destroyed.
    pub fn lifecycle_unchanged(&self) -> bool {
        self.transitions
            .iter()
            .all(|t| matches!(t, Transition::None | Transition::Updated))
    }
}

/// Subscriber-side state for one side: the handle exists iff the hand does.
struct LogicalHand<H> {
    handle: Option<H>,
}

impl<H> LogicalHand<H> {
    fn absent() -> Self {
        Self { handle: None }
    }

    fn state(&self) -> HandState {
        if self.handle.is_some() {
            HandState::Present
        } else {
            HandState::Absent
        }
    }
}

/// Owns the renderable hands and keeps them in step with incoming frames.
pub struct HandReconciler<R: HandRenderer> {
    renderer: R,
    hands: [LogicalHand<R::Handle>; 2],
}

impl<R: HandRenderer> HandReconciler<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            hands: [LogicalHand::absent(), LogicalHand::absent()],
        }
    }

    pub fn state(&self, side: Side) -> HandState {
        self.hands[side.index()].state()
    }

    pub fn exists(&self, side: Side) -> bool {
        self.state(side) == HandState::Present
    }

    /// Handle for a present hand.
    pub fn handle(&self, side: Side) -> Option<&R::Handle> {
        self.hands[side.index()].handle.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Bring both sides in line with `frame`.
    pub fn apply(&mut self, frame: &FrameMessage) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for pose in frame.hands() {
            report.transitions[pose.side.index()] = self.show(pose);
        }

        for side in Side::ALL {
            if !frame.contains(side) && self.hide(side) {
                report.transitions[side.index()] = Transition::Destroyed;
            }
        }

        report
    }

    /// Destroy every hand (shutdown).
    pub fn clear(&mut self) -> ReconcileReport {
        self.apply(&FrameMessage::empty())
    }

    fn show(&mut self, pose: &HandPose) -> Transition {
        let slot = &mut self.hands[pose.side.index()].handle;

        let transition = if slot.is_some() {
            Transition::Updated
        } else {
            log::debug!("{} hand appeared", pose.side);
            *slot = Some(self.renderer.create_hand(pose.side));
            Transition::Created
        };

        if let Some(handle) = slot.as_mut() {
            self.renderer
                .update_hand(handle, pose.position, pose.orientation);
        }
        transition
    }

    /// Returns true if a hand was destroyed.
    fn hide(&mut self, side: Side) -> bool {
        match self.hands[side.index()].handle.take() {
            Some(handle) => {
                log::debug!("{} hand lost", side);
                self.renderer.destroy_hand(handle);
                true
            }
            None => false,
        }
    }
}

impl<R: HandRenderer> Drop for HandReconciler<R> {
    fn drop(&mut self) {
        self.clear();
    }
}
