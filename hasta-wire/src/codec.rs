//! Text codec for hand pose datagrams
//!
//! # Encoding
//!
//! Each present hand, left before right, appends
//!
//! ```text
//! <tag>,(<px>, <py>, <pz>),(<qx>, <qy>, <qz>, <qw>),
//! ```
//!
//! Numbers use Rust's `f32` `Display`: shortest text that parses back to the
//! same value, `.` as decimal separator, no digit grouping, no exponent. The
//! output does not depend on locale. An empty message encodes to [`SENTINEL`].
//!
//! # Decoding
//!
//! The payload is split on `,`. Because the vector text itself contains
//! commas, every hand becomes exactly [`TOKENS_PER_HAND`] tokens:
//!
//! ```text
//! [0] tag   [1] "(px"  [2] " py"  [3] " pz)"
//! [4] "(qx" [5] " qy"  [6] " qz"  [7] " qw)"
//! ```
//!
//! Whitespace and brackets are trimmed from numeric tokens, so bare payloads
//! (`l,0,0,0,0,0,0,1,`) decode as well. Token count is validated before any
//! indexing.
//!
//! | Input | Result |
//! |-------|--------|
//! | first token `nothing` | empty message |
//! | 8 or 16 tokens (+ trailing empty) | one or two groups |
//! | any other count | [`WireError::TokenCount`] |
//! | unparseable or non-finite number | [`WireError::InvalidNumber`] |
//! | unknown tag | group skipped |
//! | same tag twice | [`WireError::DuplicateSide`] |

use crate::error::{Result, WireError};
use crate::types::{FrameMessage, HandPose, Quat, Side, Vec3};
use std::fmt::Write;

/// Payload meaning "no hands are tracked".
pub const SENTINEL: &str = "nothing";

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Tokens per hand group: tag + 3 position + 4 orientation.
pub const TOKENS_PER_HAND: usize = 8;

/// Hands per message (one per side).
pub const MAX_HANDS: usize = 2;

/// Default UDP port shared by sender and receiver.
pub const DEFAULT_PORT: u16 = 1999;

/// Default destination host for the sender.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Encode a message into a fresh string.
pub fn encode(frame: &FrameMessage) -> String {
    let mut out = String::with_capacity(96 * MAX_HANDS);
    encode_into(frame, &mut out);
    out
}

/// Encode a message into `out`, clearing it first.
///
/// Lets the sender reuse one buffer across ticks.
pub fn encode_into(frame: &FrameMessage, out: &mut String) {
    out.clear();

    if frame.is_empty() {
        out.push_str(SENTINEL);
        return;
    }

    for hand in frame.hands() {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "{tag}{d}{pos}{d}{rot}{d}",
            tag = hand.side.tag(),
            pos = hand.position,
            rot = hand.orientation,
            d = DELIMITER,
        );
    }
}

/// Decode raw datagram bytes.
pub fn decode_bytes(bytes: &[u8]) -> Result<FrameMessage> {
    let text = std::str::from_utf8(bytes)?;
    decode(text)
}

/// Decode a datagram payload.
pub fn decode(payload: &str) -> Result<FrameMessage> {
    let tokens: Vec<&str> = payload.split(DELIMITER).collect();

    if tokens.first().map(|t| t.trim()) == Some(SENTINEL) {
        return Ok(FrameMessage::empty());
    }

    // The encoder terminates every group with a delimiter
    let mut end = tokens.len();
    while end > 0 && tokens[end - 1].trim().is_empty() {
        end -= 1;
    }
    let tokens = &tokens[..end];

    let count = tokens.len();
    if count == 0 || count % TOKENS_PER_HAND != 0 || count / TOKENS_PER_HAND > MAX_HANDS {
        return Err(WireError::TokenCount { count });
    }

    let mut frame = FrameMessage::empty();
    for group in tokens.chunks_exact(TOKENS_PER_HAND) {
        let Some(pose) = decode_group(group)? else {
            continue;
        };
        if !frame.insert(pose) {
            return Err(WireError::DuplicateSide(pose.side));
        }
    }

    Ok(frame)
}

/// Decode one 8-token group. `Ok(None)` for an unknown side tag.
fn decode_group(group: &[&str]) -> Result<Option<HandPose>> {
    let Some(side) = Side::from_tag(group[0].trim()) else {
        return Ok(None);
    };

    let position = Vec3::new(
        parse_component(group[1])?,
        parse_component(group[2])?,
        parse_component(group[3])?,
    );
    let orientation = Quat::new(
        parse_component(group[4])?,
        parse_component(group[5])?,
        parse_component(group[6])?,
        parse_component(group[7])?,
    );

    Ok(Some(HandPose::new(side, position, orientation)))
}

fn parse_component(token: &str) -> Result<f32> {
    let cleaned = token
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();

    match cleaned.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(WireError::InvalidNumber(token.to_string())),
    }
}
