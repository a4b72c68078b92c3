//! UDP receive loop
//!
//! Runs on its own thread. Each datagram is decoded and published to the
//! [`HandoffSlot`]; the renderer is never called from here.
//!
//! # Error Handling
//!
//! | Event | Action |
//! |-------|--------|
//! | bind fails | [`PoseReceiver::bind`] returns an error |
//! | recv timeout | recheck shutdown flag, keep waiting |
//! | other recv error | count, log, keep waiting |
//! | decode error | count, log, drop datagram (slot untouched) |
//! | datagram larger than the limit | counted as a decode error |
//!
//! Nothing that arrives on the socket can stop the loop.

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::handoff::HandoffSlot;
use hasta_wire::decode_bytes;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Largest UDP payload over IPv4. Two hands encode to well under 256 bytes.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Counters shared between the receive thread and whoever reports them
#[derive(Debug, Default)]
pub struct ReceiverStats {
    datagrams: AtomicU64,
    sentinels: AtomicU64,
    decode_failures: AtomicU64,
    recv_errors: AtomicU64,
}

/// Point-in-time copy of [`ReceiverStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Datagrams that decoded
    pub datagrams: u64,
    /// Of those, "no hands" datagrams
    pub sentinels: u64,
    /// Datagrams dropped as malformed
    pub decode_failures: u64,
    /// Socket errors other than timeouts
    pub recv_errors: u64,
}

impl ReceiverStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            datagrams: self.datagrams.load(Ordering::Relaxed),
            sentinels: self.sentinels.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            recv_errors: self.recv_errors.load(Ordering::Relaxed),
        }
    }
}

/// Receives pose datagrams and feeds the hand-off slot
pub struct PoseReceiver {
    socket: UdpSocket,
    slot: Arc<HandoffSlot>,
    stats: Arc<ReceiverStats>,
    running: Arc<AtomicBool>,
    max_datagram_size: usize,
}

impl PoseReceiver {
    /// Bind the receive socket from config.
    pub fn bind(
        config: &NetworkConfig,
        slot: Arc<HandoffSlot>,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let socket = UdpSocket::bind(&config.bind_address).map_err(|source| Error::Bind {
            addr: config.bind_address.clone(),
            source,
        })?;
        // Bounded recv so shutdown is noticed
        socket.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms.max(1))))?;

        log::info!("UDP receiver bound to {}", config.bind_address);
        Ok(Self::from_socket(socket, slot, running))
    }

    /// Wrap an already bound socket. The caller sets any read timeout.
    pub fn from_socket(
        socket: UdpSocket,
        slot: Arc<HandoffSlot>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            socket,
            slot,
            stats: Arc::new(ReceiverStats::default()),
            running,
            max_datagram_size: MAX_DATAGRAM_SIZE,
        }
    }

    /// Reject datagrams longer than `size` bytes instead of the UDP maximum.
    pub fn with_max_datagram_size(mut self, size: usize) -> Self {
        self.max_datagram_size = size;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub fn stats(&self) -> Arc<ReceiverStats> {
        Arc::clone(&self.stats)
    }

    /// Decode one datagram and publish it. Returns whether it was accepted.
    pub fn handle_datagram(&self, bytes: &[u8]) -> bool {
        match decode_bytes(bytes) {
            Ok(frame) => {
                self.stats.datagrams.fetch_add(1, Ordering::Relaxed);
                if frame.is_empty() {
                    self.stats.sentinels.fetch_add(1, Ordering::Relaxed);
                }
                log::trace!("Decoded {} hand(s)", frame.len());
                self.slot.publish(frame);
                true
            }
            Err(e) => {
                // Previous state stays; next datagram carries a full snapshot
                self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "Dropping malformed datagram ({}): {:?}",
                    e,
                    String::from_utf8_lossy(bytes)
                );
                false
            }
        }
    }

    /// Count and drop a datagram that did not fit the receive buffer.
    fn reject_oversized(&self, src: SocketAddr) {
        self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
        log::warn!(
            "Dropping datagram from {} larger than {} bytes",
            src,
            self.max_datagram_size
        );
    }

    /// Run the receive loop until `running` goes false (blocking).
    pub fn run(self) {
        log::info!("UDP receiver started");

        // One spare byte: a full buffer means the datagram was cut short
        let mut buffer = vec![0u8; self.max_datagram_size + 1];

        while self.running.load(Ordering::Relaxed) {
            let (len, src) = match self.socket.recv_from(&mut buffer) {
                Ok(result) => result,
                Err(e) if e.kind() == ErrorKind::WouldBlock => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                Err(e) => {
                    self.stats.recv_errors.fetch_add(1, Ordering::Relaxed);
                    log::error!("UDP recv error: {}", e);
                    continue;
                }
            };

            if len > self.max_datagram_size {
                self.reject_oversized(src);
                continue;
            }

            log::trace!("{} bytes from {}", len, src);
            self.handle_datagram(&buffer[..len]);
        }

        log::info!("UDP receiver stopped");
    }

    /// Run the loop on a named background thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("pose-receiver".to_string())
            .spawn(move || self.run())
            .map_err(|e| Error::Other(format!("Failed to spawn receiver thread: {}", e)))
    }
}
