use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SimError;

/// The four arm joints, base first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joint {
    Base,
    Shoulder,
    Elbow,
    Wrist,
}

impl Joint {
    pub const ALL: [Joint; 4] = [Joint::Base, Joint::Shoulder, Joint::Elbow, Joint::Wrist];

    pub fn name(self) -> &'static str {
        match self {
            Joint::Base => "base",
            Joint::Shoulder => "shoulder",
            Joint::Elbow => "elbow",
            Joint::Wrist => "wrist",
        }
    }

    /// Input range in degrees offered to the operator for this joint.
    ///
    /// Only the interactive input path clamps to it; `solve` and `plan`
    /// accept any finite angle.
    pub fn range(self) -> (f64, f64) {
        match self {
            Joint::Base | Joint::Wrist => (-180.0, 180.0),
            Joint::Shoulder | Joint::Elbow => (0.0, 180.0),
        }
    }

    pub fn clamp(self, degrees: f64) -> f64 {
        let (min, max) = self.range();
        degrees.clamp(min, max)
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Joint {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Joint::ALL
            .into_iter()
            .find(|j| j.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SimError::UnknownJoint(trimmed.to_string()))
    }
}

/// Joint angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointPose {
    pub base: f64,     // yaw about the vertical axis
    pub shoulder: f64,
    pub elbow: f64,
    pub wrist: f64,
}

impl JointPose {
    /// Pose a fresh session starts in and `reset` returns to.
    pub const HOME: JointPose = JointPose { base: 0.0, shoulder: 45.0, elbow: 90.0, wrist: 0.0 };

    pub const fn new(base: f64, shoulder: f64, elbow: f64, wrist: f64) -> Self {
        Self { base, shoulder, elbow, wrist }
    }

    pub fn get(&self, joint: Joint) -> f64 {
        match joint {
            Joint::Base => self.base,
            Joint::Shoulder => self.shoulder,
            Joint::Elbow => self.elbow,
            Joint::Wrist => self.wrist,
        }
    }

    pub fn set(&mut self, joint: Joint, degrees: f64) {
        match joint {
            Joint::Base => self.base = degrees,
            Joint::Shoulder => self.shoulder = degrees,
            Joint::Elbow => self.elbow = degrees,
            Joint::Wrist => self.wrist = degrees,
        }
    }

    /// Copy with every joint clamped to its input range.
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for joint in Joint::ALL {
            out.set(joint, joint.clamp(self.get(joint)));
        }
        out
    }

    /// Componentwise `self + (other - self) * t`, no angle wrapping.
    pub fn lerp(&self, other: &JointPose, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            base: mix(self.base, other.base),
            shoulder: mix(self.shoulder, other.shoulder),
            elbow: mix(self.elbow, other.elbow),
            wrist: mix(self.wrist, other.wrist),
        }
    }
}

/// Tool-tip position in the robot base frame (same units as the link lengths).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ToolPosition {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance from the vertical axis through the base.
    pub fn horizontal_radius(&self) -> f64 {
        self.x.hypot(self.y)
    }
}
