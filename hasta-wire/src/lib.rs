//! Hasta wire protocol
//!
//! Shared types and the text codec used by `hasta-sender` and
//! `hasta-receiver` to stream tracked hand poses over UDP.
//!
//! ## Datagram Layout
//!
//! One datagram per sender tick, UTF-8 text, no length prefix (UDP keeps the
//! datagram boundary for us):
//!
//! ```text
//! nothing                                          zero hands tracked
//! l,(px, py, pz),(qx, qy, qz, qw),                 one hand
//! l,(px, py, pz),(qx, qy, qz, qw),r,(...),(...),   both hands, left first
//! ```
//!
//! There is no sequence number, checksum or timestamp. Every datagram is a
//! complete snapshot, so a lost datagram is repaired by the next one.

pub mod codec;
pub mod error;
pub mod types;

pub use codec::{
    DEFAULT_HOST, DEFAULT_PORT, MAX_HANDS, SENTINEL, TOKENS_PER_HAND, decode, decode_bytes,
    encode, encode_into,
};
pub use error::{Result, WireError};
pub use types::{FrameMessage, HandPose, Quat, Side, Vec3};
