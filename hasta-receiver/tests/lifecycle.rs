//! Hand lifecycle scenarios, from raw payloads through to renderer calls.

use hasta_receiver::{HandReconciler, HandRenderer, HandoffSlot, PoseReceiver};
use hasta_wire::{Quat, Side, Vec3};
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(Side),
    Update(Side, Vec3),
    Destroy(Side),
}

/// Records every renderer call in order.
#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
}

impl HandRenderer for RecordingRenderer {
    type Handle = Side;

    fn create_hand(&mut self, side: Side) -> Side {
        self.calls.push(Call::Create(side));
        side
    }

    fn update_hand(&mut self, handle: &mut Side, position: Vec3, _orientation: Quat) {
        self.calls.push(Call::Update(*handle, position));
    }

    fn destroy_hand(&mut self, handle: Side) {
        self.calls.push(Call::Destroy(handle));
    }
}

/// Receiver and consumer wired together without a socket thread.
struct Pipeline {
    receiver: PoseReceiver,
    slot: Arc<HandoffSlot>,
    reconciler: HandReconciler<RecordingRenderer>,
}

impl Pipeline {
    fn new() -> Self {
        let slot = Arc::new(HandoffSlot::new());
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let receiver =
            PoseReceiver::from_socket(socket, Arc::clone(&slot), Arc::new(AtomicBool::new(true)));
        Self {
            receiver,
            slot,
            reconciler: HandReconciler::new(RecordingRenderer::default()),
        }
    }

    /// Deliver one datagram and run one consumer tick.
    fn step(&mut self, payload: &str) {
        self.receiver.handle_datagram(payload.as_bytes());
        self.tick();
    }

    fn tick(&mut self) {
        if let Some(frame) = self.slot.take() {
            self.reconciler.apply(&frame);
        }
    }

    fn calls(&self) -> &[Call] {
        &self.reconciler.renderer().calls
    }

    fn lifecycle_calls(&self) -> Vec<Call> {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, Call::Update(..)))
            .cloned()
            .collect()
    }
}

#[test]
fn test_create_destroy_recreate() {
    let mut p = Pipeline::new();

    p.step("l,0,0,0,0,0,0,1,");
    p.step("nothing");
    p.step("l,1,1,1,0,0,0,1,");

    assert_eq!(
        p.calls(),
        [
            Call::Create(Side::Left),
            Call::Update(Side::Left, Vec3::new(0.0, 0.0, 0.0)),
            Call::Destroy(Side::Left),
            Call::Create(Side::Left),
            Call::Update(Side::Left, Vec3::new(1.0, 1.0, 1.0)),
        ]
    );
}

#[test]
fn test_repeated_frame_updates_without_recreating() {
    let mut p = Pipeline::new();

    p.step("r,(0.5, 0.5, 0.5),(0, 0, 0, 1),");
    p.step("r,(0.5, 0.5, 0.5),(0, 0, 0, 1),");

    assert_eq!(p.lifecycle_calls(), [Call::Create(Side::Right)]);
    assert_eq!(p.calls().len(), 3);
}

#[test]
fn test_sentinel_clears_both_sides() {
    let mut p = Pipeline::new();

    p.step("l,0,0,0,0,0,0,1,r,0,0,0,0,0,0,1,");
    p.step("nothing");

    assert!(!p.reconciler.exists(Side::Left));
    assert!(!p.reconciler.exists(Side::Right));
    assert_eq!(
        p.lifecycle_calls(),
        [
            Call::Create(Side::Left),
            Call::Create(Side::Right),
            Call::Destroy(Side::Left),
            Call::Destroy(Side::Right),
        ]
    );
}

#[test]
fn test_swap_hands_in_one_pass() {
    let mut p = Pipeline::new();

    p.step("l,0,0,0,0,0,0,1,");
    p.step("r,2,2,2,0,0,0,1,");

    assert!(!p.reconciler.exists(Side::Left));
    assert!(p.reconciler.exists(Side::Right));
    assert_eq!(
        p.lifecycle_calls(),
        [
            Call::Create(Side::Left),
            Call::Create(Side::Right),
            Call::Destroy(Side::Left),
        ]
    );
}

#[test]
fn test_malformed_payload_keeps_state() {
    let mut p = Pipeline::new();

    p.step("l,0,0,0,0,0,0,1,");
    let before = p.calls().len();

    p.step("l,1.0,2.0");
    p.step("l,x,0,0,0,0,0,1,");
    p.step("");

    assert!(p.reconciler.exists(Side::Left));
    assert_eq!(p.calls().len(), before);
    assert_eq!(p.receiver.stats().snapshot().decode_failures, 3);
}

#[test]
fn test_unknown_tag_counts_as_absent() {
    let mut p = Pipeline::new();

    p.step("l,0,0,0,0,0,0,1,");
    p.step("q,0,0,0,0,0,0,1,r,3,3,3,0,0,0,1,");

    assert!(!p.reconciler.exists(Side::Left));
    assert!(p.reconciler.exists(Side::Right));
}

/// With no new datagrams, hands hold their last pose indefinitely.
#[test]
fn test_silence_freezes_hands() {
    let mut p = Pipeline::new();

    p.step("l,4,5,6,0,0,0,1,");
    let before = p.calls().to_vec();

    for _ in 0..600 {
        p.tick();
    }

    assert!(p.reconciler.exists(Side::Left));
    assert_eq!(p.calls(), before.as_slice());
}

/// Only the newest datagram between two ticks is reconciled.
#[test]
fn test_intermediate_frames_dropped() {
    let mut p = Pipeline::new();

    p.receiver.handle_datagram(b"l,1,0,0,0,0,0,1,");
    p.receiver.handle_datagram(b"nothing");
    p.receiver.handle_datagram(b"l,3,0,0,0,0,0,1,");
    p.tick();

    assert_eq!(
        p.calls(),
        [
            Call::Create(Side::Left),
            Call::Update(Side::Left, Vec3::new(3.0, 0.0, 0.0)),
        ]
    );
    assert_eq!(p.slot.overwritten(), 2);
}

/// Full path over loopback UDP with the receive loop on its own thread.
#[test]
fn test_loopback_receive_thread() {
    let slot = Arc::new(HandoffSlot::new());
    let running = Arc::new(AtomicBool::new(true));

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(20)))
        .unwrap();
    let receiver = PoseReceiver::from_socket(socket, Arc::clone(&slot), Arc::clone(&running));
    let addr = receiver.local_addr().unwrap();
    let stats = receiver.stats();
    let handle = receiver.spawn().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    let mut reconciler = HandReconciler::new(RecordingRenderer::default());

    let mut wait_for =
        |payload: &[u8], check: &dyn Fn(&HandReconciler<RecordingRenderer>) -> bool| {
            let deadline = Instant::now() + Duration::from_secs(2);
            while Instant::now() < deadline {
                sender.send_to(payload, addr).unwrap();
                std::thread::sleep(Duration::from_millis(5));
                if let Some(frame) = slot.take() {
                    reconciler.apply(&frame);
                }
                if check(&reconciler) {
                    return true;
                }
            }
            false
        };

    assert!(wait_for(b"l,0,0,0,0,0,0,1,r,1,1,1,0,0,0,1,", &|r| {
        r.exists(Side::Left) && r.exists(Side::Right)
    }));
    assert!(wait_for(b"garbage", &|_| stats.snapshot().decode_failures > 0));
    assert!(wait_for(b"nothing", &|r| {
        !r.exists(Side::Left) && !r.exists(Side::Right)
    }));

    running.store(false, Ordering::Relaxed);
    handle.join().unwrap();

    let calls = &reconciler.renderer().calls;
    let creates = calls.iter().filter(|c| matches!(c, Call::Create(_))).count();
    let destroys = calls.iter().filter(|c| matches!(c, Call::Destroy(_))).count();
    assert_eq!(creates, 2);
    assert_eq!(destroys, 2);
}

/// A datagram cut short by the receive buffer is dropped, even when the
/// prefix alone would decode.
#[test]
fn test_oversized_datagram_rejected() {
    let slot = Arc::new(HandoffSlot::new());
    let running = Arc::new(AtomicBool::new(true));

    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(20)))
        .unwrap();
    let receiver = PoseReceiver::from_socket(socket, Arc::clone(&slot), Arc::clone(&running))
        .with_max_datagram_size(2048);
    let addr = receiver.local_addr().unwrap();
    let stats = receiver.stats();
    let handle = receiver.spawn().unwrap();

    let payload = format!("l,1,2,3,0,0,0,1{}junk,", " ".repeat(2100));
    assert!(hasta_wire::decode(&payload).is_err());
    assert!(hasta_wire::decode(&payload[..2048]).is_ok());

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    sender.send_to(payload.as_bytes(), addr).unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while stats.snapshot().decode_failures == 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    running.store(false, Ordering::Relaxed);
    handle.join().unwrap();

    let s = stats.snapshot();
    assert_eq!(s.decode_failures, 1);
    assert_eq!(s.datagrams, 0);
    assert!(slot.take().is_none());
}
