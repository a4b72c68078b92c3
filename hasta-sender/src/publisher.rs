//! UDP pose publisher
//!
//! Sends one datagram per tick to a single fixed receiver.
//!
//! # Delivery
//!
//! Fire-and-forget. The socket is non-blocking, so a full send buffer or an
//! unreachable peer can never stall the caller's frame loop. Failed sends are
//! counted and logged at debug level, then forgotten: the next tick carries
//! the complete hand state again, so nothing needs to be retried.
//!
//! | Situation | Behaviour |
//! |-----------|-----------|
//! | bind / resolve fails | [`PosePublisher::new`] returns an error |
//! | send fails (any reason) | counted, dropped |
//! | no hands tracked | sentinel payload sent |
//! | two poses for one side | first kept, rest dropped |

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::offsets::HandOffsets;
use hasta_wire::{FrameMessage, HandPose, MAX_HANDS, encode_into};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Counters for the send loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublisherStats {
    /// Ticks processed
    pub ticks: u64,
    /// Datagrams handed to the OS
    pub sent: u64,
    /// Sends that failed and were dropped
    pub send_failures: u64,
    /// Ticks with no tracked hands
    pub empty_ticks: u64,
}

/// Publishes hand poses to one receiver
pub struct PosePublisher {
    socket: UdpSocket,
    destination: SocketAddr,
    offsets: HandOffsets,
    /// Reused across ticks
    send_buffer: String,
    stats: PublisherStats,
}

impl PosePublisher {
    /// Bind a socket and resolve the destination from config.
    pub fn new(config: &NetworkConfig, offsets: HandOffsets) -> Result<Self> {
        let socket = UdpSocket::bind(&config.bind_address).map_err(|source| Error::Bind {
            addr: config.bind_address.clone(),
            source,
        })?;
        let destination = resolve(&config.destination)?;
        Self::from_socket(socket, destination, offsets)
    }

    /// Wrap an already bound socket.
    pub fn from_socket(
        socket: UdpSocket,
        destination: SocketAddr,
        offsets: HandOffsets,
    ) -> Result<Self> {
        socket.set_nonblocking(true)?;

        log::info!(
            "Pose publisher {} -> {}",
            socket
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "?".to_string()),
            destination
        );

        Ok(Self {
            socket,
            destination,
            offsets,
            send_buffer: String::with_capacity(256),
            stats: PublisherStats::default(),
        })
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn offsets(&self) -> &HandOffsets {
        &self.offsets
    }

    /// Mutable access for runtime calibration. Only later ticks see changes.
    pub fn offsets_mut(&mut self) -> &mut HandOffsets {
        &mut self.offsets
    }

    pub fn stats(&self) -> PublisherStats {
        self.stats
    }

    /// Build this tick's message: offsets applied, one pose per side.
    pub fn build_frame(&self, hands: &[HandPose]) -> FrameMessage {
        let mut frame = FrameMessage::empty();

        for hand in hands {
            let adjusted = hand.offset_by(self.offsets.for_side(hand.side));
            if !frame.insert(adjusted) {
                log::debug!("Dropping extra {} hand pose", hand.side);
            }
        }

        if hands.len() > MAX_HANDS {
            log::debug!("Tracker reported {} hands", hands.len());
        }

        frame
    }

    /// Encode and send one datagram. Send failures only show up in [`stats`](Self::stats).
    pub fn tick(&mut self, hands: &[HandPose]) {
        let frame = self.build_frame(hands);
        self.stats.ticks += 1;
        if frame.is_empty() {
            self.stats.empty_ticks += 1;
        }

        encode_into(&frame, &mut self.send_buffer);

        match self
            .socket
            .send_to(self.send_buffer.as_bytes(), self.destination)
        {
            Ok(_) => {
                self.stats.sent += 1;
                log::trace!("Sent {:?} to {}", self.send_buffer, self.destination);
            }
            Err(e) => {
                // Next tick resends full state
                self.stats.send_failures += 1;
                log::debug!("Dropped datagram to {}: {}", self.destination, e);
            }
        }
    }
}

fn resolve(address: &str) -> Result<SocketAddr> {
    address
        .to_socket_addrs()
        .map_err(|e| Error::Resolve(format!("{}: {}", address, e)))?
        .next()
        .ok_or_else(|| Error::Resolve(address.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hasta_wire::{Quat, Side, Vec3, decode};
    use std::time::Duration;

    fn pair() -> (PosePublisher, UdpSocket) {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let publisher = PosePublisher::from_socket(
            socket,
            receiver.local_addr().unwrap(),
            HandOffsets::default(),
        )
        .unwrap();
        (publisher, receiver)
    }

    fn recv_text(socket: &UdpSocket) -> String {
        let mut buf = [0u8; 1024];
        let (len, _) = socket.recv_from(&mut buf).unwrap();
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    fn left_at_origin() -> HandPose {
        HandPose::new(Side::Left, Vec3::ZERO, Quat::IDENTITY)
    }

    #[test]
    fn test_no_hands_sends_sentinel() {
        let (mut publisher, receiver) = pair();
        publisher.tick(&[]);
        assert_eq!(recv_text(&receiver), "nothing");

        let stats = publisher.stats();
        assert_eq!(stats.empty_ticks, 1);
        assert_eq!(stats.sent, 1);
    }

    #[test]
    fn test_one_datagram_per_tick() {
        let (mut publisher, receiver) = pair();
        let right = HandPose::new(Side::Right, Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);

        publisher.tick(&[right, left_at_origin()]);
        publisher.tick(&[]);

        let first = decode(&recv_text(&receiver)).unwrap();
        assert_eq!(first.len(), 2);
        assert!(decode(&recv_text(&receiver)).unwrap().is_empty());

        let stats = publisher.stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.send_failures, 0);
    }

    #[test]
    fn test_offset_applied_to_position() {
        let (mut publisher, receiver) = pair();
        publisher.offsets_mut().left = Vec3::new(0.1, 0.0, 0.0);

        publisher.tick(&[left_at_origin()]);
        let text = recv_text(&receiver);
        assert_eq!(text, "l,(0.1, 0, 0),(0, 0, 0, 1),");

        let left = *decode(&text).unwrap().get(Side::Left).unwrap();
        assert_relative_eq!(left.position.x, 0.1);
    }

    #[test]
    fn test_offset_change_only_affects_later_ticks() {
        let (mut publisher, _receiver) = pair();
        publisher.offsets_mut().right = Vec3::new(0.0, 0.5, 0.0);
        let right = HandPose::new(Side::Right, Vec3::ZERO, Quat::IDENTITY);

        let before = publisher.build_frame(&[right]);
        publisher.offsets_mut().right = Vec3::new(0.0, 1.0, 0.0);
        let after = publisher.build_frame(&[right]);

        assert_eq!(before.get(Side::Right).unwrap().position.y, 0.5);
        assert_eq!(after.get(Side::Right).unwrap().position.y, 1.0);
    }

    #[test]
    fn test_duplicate_side_keeps_first() {
        let (publisher, _receiver) = pair();
        let second = HandPose::new(Side::Left, Vec3::new(9.0, 9.0, 9.0), Quat::IDENTITY);

        let frame = publisher.build_frame(&[left_at_origin(), second]);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.get(Side::Left).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn test_unresolvable_destination_is_fatal() {
        let config = NetworkConfig {
            destination: "not an address".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
        };
        assert!(matches!(
            PosePublisher::new(&config, HandOffsets::default()),
            Err(Error::Resolve(_))
        ));
    }

    #[test]
    fn test_bad_bind_address_is_fatal() {
        let config = NetworkConfig {
            destination: "127.0.0.1:1999".to_string(),
            bind_address: "127.0.0.1:99999".to_string(),
        };
        assert!(PosePublisher::new(&config, HandOffsets::default()).is_err());
    }
}
