//! Per-side calibration offsets
//!
//! The receiving device and the tracker rarely agree on where the origin is,
//! so each hand gets an additive position offset that the user nudges at
//! runtime until the remote hands line up. Offsets are applied when a
//! datagram is built and never touch poses that were already sent.
//!
//! Offsets are plain values owned by the publisher. Commands arrive over a
//! channel and are applied on the send loop, so nothing else mutates them.

use crate::error::{Error, Result};
use hasta_wire::{Side, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Offset applied to each hand's position before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct HandOffsets {
    #[serde(default)]
    pub left: Vec3,
    #[serde(default)]
    pub right: Vec3,
}

/// Position axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Runtime offset adjustment.
///
/// Text form, as typed on the sender console:
///
/// | Input | Command |
/// |-------|---------|
/// | `lx+` / `lx-` | nudge left X by +/- one step (also `ly`, `lz`, `rx`, ...) |
/// | `reset` | zero both offsets |
/// | `show` | log the current offsets |
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OffsetCommand {
    Nudge { side: Side, axis: Axis, sign: f32 },
    Reset,
    Show,
}

impl HandOffsets {
    pub fn new(left: Vec3, right: Vec3) -> Self {
        Self { left, right }
    }

    pub fn for_side(&self, side: Side) -> Vec3 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn for_side_mut(&mut self, side: Side) -> &mut Vec3 {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Apply a command. Returns `true` if the offsets changed.
    pub fn apply(&mut self, command: OffsetCommand, step: f32) -> bool {
        match command {
            OffsetCommand::Nudge { side, axis, sign } => {
                let offset = self.for_side_mut(side);
                let delta = sign * step;
                match axis {
                    Axis::X => offset.x += delta,
                    Axis::Y => offset.y += delta,
                    Axis::Z => offset.z += delta,
                }
                delta != 0.0
            }
            OffsetCommand::Reset => {
                let changed = *self != HandOffsets::default();
                *self = HandOffsets::default();
                changed
            }
            OffsetCommand::Show => false,
        }
    }

    /// Load persisted offsets
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Persist offsets
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl fmt::Display for HandOffsets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "left {} right {}", self.left, self.right)
    }
}

impl FromStr for OffsetCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim().to_ascii_lowercase();
        match input.as_str() {
            "reset" => return Ok(OffsetCommand::Reset),
            "show" => return Ok(OffsetCommand::Show),
            _ => {}
        }

        let invalid = || Error::InvalidCommand(s.trim().to_string());
        let bytes = input.as_bytes();
        if bytes.len() != 3 {
            return Err(invalid());
        }

        let side = match bytes[0] {
            b'l' => Side::Left,
            b'r' => Side::Right,
            _ => return Err(invalid()),
        };
        let axis = match bytes[1] {
            b'x' => Axis::X,
            b'y' => Axis::Y,
            b'z' => Axis::Z,
            _ => return Err(invalid()),
        };
        let sign = match bytes[2] {
            b'+' => 1.0,
            b'-' => -1.0,
            _ => return Err(invalid()),
        };

        Ok(OffsetCommand::Nudge { side, axis, sign })
    }
}
