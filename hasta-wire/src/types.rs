//! Pose types shared by sender and receiver

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Which hand a pose belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides in wire order (left before right).
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Single-letter tag used on the wire.
    pub fn tag(self) -> &'static str {
        match self {
            Side::Left => "l",
            Side::Right => "r",
        }
    }

    /// Parse a wire tag. Anything other than `l` or `r` is unknown.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "l" => Some(Side::Left),
            "r" => Some(Side::Right),
            _ => None,
        }
    }

    /// Stable index for per-side arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// 3D position in engine-scale units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

/// Wire text form: `(x, y, z)`.
impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Orientation quaternion, component order (x, y, z, w).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about the Y (up) axis.
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Quat::new(0.0, s, 0.0, c)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

/// Wire text form: `(x, y, z, w)`.
impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

/// Pose of one tracked hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    pub side: Side,
    pub position: Vec3,
    pub orientation: Quat,
}

impl HandPose {
    pub fn new(side: Side, position: Vec3, orientation: Quat) -> Self {
        Self {
            side,
            position,
            orientation,
        }
    }

    /// Same pose with `offset` added to the position.
    pub fn offset_by(self, offset: Vec3) -> Self {
        Self {
            position: self.position + offset,
            ..self
        }
    }
}

/// One datagram worth of hands.
///
/// Holds at most one pose per side. An empty message is the "no hands
/// present" state and encodes to the sentinel payload.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameMessage {
    hands: [Option<HandPose>; 2],
}

impl FrameMessage {
    /// Message with no hands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a pose. Returns `false` and leaves the message unchanged if that
    /// side is already present.
    pub fn insert(&mut self, pose: HandPose) -> bool {
        let slot = &mut self.hands[pose.side.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(pose);
        true
    }

    pub fn get(&self, side: Side) -> Option<&HandPose> {
        self.hands[side.index()].as_ref()
    }

    pub fn contains(&self, side: Side) -> bool {
        self.hands[side.index()].is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.hands.iter().flatten().count()
    }

    /// Present hands, left before right.
    pub fn hands(&self) -> impl Iterator<Item = &HandPose> {
        self.hands.iter().flatten()
    }
}
