//! Cumulative machine state and the line fold that maintains it
//!
//! A [`Movement`] is the machine state immediately after a line has been applied.
//! Every field persists across lines until a later line mentions it again, with one
//! exception: `extrusion` is a per-move delta and drops back to zero on any motion
//! line that carries no `E` word.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::markers::{
    ACCELERATION_PREFIX, COMMENT, FAN_PREFIX, HEIGHT_TAG, OVERHANG_PERIMETER, TYPE_TAG, WIDTH_TAG,
};
use crate::numeric::{parse_leading_number, Words};

/// Motion mode selected by a `G0`..`G3` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionKind {
    /// G0 - rapid positioning
    Rapid,
    /// G1 - linear interpolation
    Linear,
    /// G2 - clockwise arc
    ArcCw,
    /// G3 - counter-clockwise arc
    ArcCcw,
    /// No motion recorded (entry state, or a block's idle sentinel)
    None,
}

impl Default for MotionKind {
    fn default() -> Self {
        Self::None
    }
}

impl MotionKind {
    /// Map a G command number to a motion kind (0-3 only)
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Rapid),
            1 => Some(Self::Linear),
            2 => Some(Self::ArcCw),
            3 => Some(Self::ArcCcw),
            _ => None,
        }
    }

    /// G command number for this kind, `None` for [`MotionKind::None`]
    pub fn code(self) -> Option<u8> {
        match self {
            Self::Rapid => Some(0),
            Self::Linear => Some(1),
            Self::ArcCw => Some(2),
            Self::ArcCcw => Some(3),
            Self::None => None,
        }
    }

    /// Kind to use when the same path is traversed backwards.
    ///
    /// Arcs change rotation sense; straight moves are unchanged.
    pub fn reversed(self) -> Self {
        match self {
            Self::ArcCw => Self::ArcCcw,
            Self::ArcCcw => Self::ArcCw,
            other => other,
        }
    }

    pub fn is_arc(self) -> bool {
        matches!(self, Self::ArcCw | Self::ArcCcw)
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "G{}", code),
            None => write!(f, "-"),
        }
    }
}

/// Absolute machine position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Whether both planar coordinates match `other` exactly
    pub fn same_xy(&self, other: &Position) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// Arc centre offset relative to the arc's start point (`I`, `J`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcOffset {
    pub i: f64,
    pub j: f64,
}

/// Machine state snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Current role is `Overhang perimeter`
    pub is_overhang_perimeter: bool,
    /// Extrusion width from `;WIDTH:`
    pub line_width: f64,
    /// Layer height from `;HEIGHT:`
    pub line_height: f64,
    /// End point of the last motion
    pub position: Position,
    /// Kind of the last motion command
    pub motion: MotionKind,
    /// `I`/`J` of the last arc
    pub arc_center_offset: ArcOffset,
    /// From `M204 S`
    pub acceleration: f64,
    /// From `M106 S`
    pub fan_speed: f64,
    /// From `F`
    pub feed_rate: f64,
    /// `E` of the last motion line, zero when it had none
    pub extrusion: f64,
}

impl Movement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure form of [`update_movement`]: returns the folded state and whether the line moved
    pub fn fold(mut self, line: &str) -> (Self, bool) {
        let moved = update_movement(line, &mut self);
        (self, moved)
    }

    /// Same state with no pending motion
    pub fn idle(self) -> Self {
        Self {
            motion: MotionKind::None,
            ..self
        }
    }

    fn apply_comment(&mut self, line: &str) {
        if let Some(role) = line.strip_prefix(TYPE_TAG) {
            self.is_overhang_perimeter = role == OVERHANG_PERIMETER;
        } else if let Some(value) = line.strip_prefix(WIDTH_TAG) {
            match parse_leading_number(value) {
                Some(width) => self.line_width = width,
                None => tracing::trace!("ignoring malformed width: {}", line),
            }
        } else if let Some(value) = line.strip_prefix(HEIGHT_TAG) {
            match parse_leading_number(value) {
                Some(height) => self.line_height = height,
                None => tracing::trace!("ignoring malformed height: {}", line),
            }
        }
    }

    fn apply_motion(&mut self, kind: MotionKind, line: &str) -> bool {
        self.motion = kind;
        let words = Words::scan(line);
        let mut moved = false;

        if let Some(x) = words.get('X') {
            self.position.x = x;
            moved = true;
        }
        if let Some(y) = words.get('Y') {
            self.position.y = y;
            moved = true;
        }
        if let Some(z) = words.get('Z') {
            self.position.z = z;
            moved = true;
        }
        match words.get('E') {
            Some(e) => {
                self.extrusion = e;
                moved = true;
            }
            None => self.extrusion = 0.0,
        }
        if let Some(f) = words.get('F') {
            self.feed_rate = f;
        }
        if let Some(i) = words.get('I') {
            self.arc_center_offset.i = i;
        }
        if let Some(j) = words.get('J') {
            self.arc_center_offset.j = j;
        }

        moved
    }
}

/// Fold one line into `movement`.
///
/// Returns `true` when the line is a `G0`-`G3` command carrying at least one of
/// `X`, `Y`, `Z` or `E`. Feed-only lines, comments, fan and acceleration commands
/// update the state but report no movement. Unrecognised lines leave it untouched.
pub fn update_movement(line: &str, movement: &mut Movement) -> bool {
    if line.is_empty() {
        return false;
    }

    if line.starts_with(COMMENT) {
        movement.apply_comment(line);
        return false;
    }

    if let Some(value) = line.strip_prefix(ACCELERATION_PREFIX) {
        match parse_leading_number(value) {
            Some(acceleration) => movement.acceleration = acceleration,
            None => tracing::trace!("ignoring malformed acceleration: {}", line),
        }
        return false;
    }

    if let Some(value) = line.strip_prefix(FAN_PREFIX) {
        if let Some(fan_speed) = parse_leading_number(value) {
            movement.fan_speed = fan_speed;
        }
        return false;
    }

    match motion_code(line).and_then(MotionKind::from_code) {
        Some(kind) => movement.apply_motion(kind, line),
        None => false,
    }
}

/// Command number of a `G<n>` line, `None` for anything else
fn motion_code(line: &str) -> Option<u32> {
    let rest = line.strip_prefix('G')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[..digits].parse().ok()
}
