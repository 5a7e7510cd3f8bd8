//! Forward kinematics for the 4-joint cutting arm.
//!
//! The arm is modelled as a planar three-link chain (shoulder, elbow, wrist
//! angles add up in one vertical plane) that is then yawed about the vertical
//! axis by the base angle. There is no shoulder offset out of that plane and
//! no tool orientation tracking; this approximation is what the simulator
//! shows and is kept as is.

use serde::Serialize;

use crate::pose::{JointPose, ToolPosition};

/// Fixed link lengths of the arm, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkLengths {
    pub base_height: f64,
    pub shoulder_to_elbow: f64,
    pub elbow_to_wrist: f64,
    pub wrist_to_tool: f64,
}

impl LinkLengths {
    /// The gem-cutting arm driven by the dashboard.
    pub const GEM_CUTTER: LinkLengths = LinkLengths {
        base_height: 300.0,
        shoulder_to_elbow: 80.0,
        elbow_to_wrist: 70.0,
        wrist_to_tool: 50.0,
    };

    /// Reach of the planar sub-chain when fully stretched.
    pub fn reach(&self) -> f64 {
        self.shoulder_to_elbow + self.elbow_to_wrist + self.wrist_to_tool
    }
}

impl Default for LinkLengths {
    fn default() -> Self {
        Self::GEM_CUTTER
    }
}

/// World-frame points along the arm for one pose, base first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmChain {
    pub base: ToolPosition,
    pub shoulder: ToolPosition,
    pub elbow: ToolPosition,
    pub wrist: ToolPosition,
}

impl ArmChain {
    /// Link segments as (from, to) pairs, ready to draw.
    pub fn segments(&self) -> [(ToolPosition, ToolPosition); 3] {
        [
            (self.base, self.shoulder),
            (self.shoulder, self.elbow),
            (self.elbow, self.wrist),
        ]
    }

    pub fn tool(&self) -> ToolPosition {
        self.wrist
    }
}

/// Tool-tip position for `pose` on the gem-cutting arm.
pub fn solve(pose: &JointPose) -> ToolPosition {
    solve_with(&LinkLengths::GEM_CUTTER, pose)
}

/// Tool-tip position for `pose` with an explicit set of link lengths.
///
/// Total: any finite angles give a finite point, out-of-range ones included.
pub fn solve_with(links: &LinkLengths, pose: &JointPose) -> ToolPosition {
    chain_with(links, pose).wrist
}

/// Every joint point of the gem-cutting arm for `pose`.
pub fn joint_chain(pose: &JointPose) -> ArmChain {
    chain_with(&LinkLengths::GEM_CUTTER, pose)
}

pub fn chain_with(links: &LinkLengths, pose: &JointPose) -> ArmChain {
    let base_rad = pose.base.to_radians();
    let shoulder_rad = pose.shoulder.to_radians();
    let elbow_rad = pose.elbow.to_radians();
    let wrist_rad = pose.wrist.to_radians();

    // In-plane (radius, height) of each link end, relative to the shoulder pivot.
    let a1 = shoulder_rad;
    let a2 = shoulder_rad + elbow_rad;
    let arm_angle = a2 + wrist_rad;

    let shoulder = (links.shoulder_to_elbow * a1.cos(), links.shoulder_to_elbow * a1.sin());
    let elbow = (
        shoulder.0 + links.elbow_to_wrist * a2.cos(),
        shoulder.1 + links.elbow_to_wrist * a2.sin(),
    );
    let wrist = (
        elbow.0 + links.wrist_to_tool * arm_angle.cos(),
        elbow.1 + links.wrist_to_tool * arm_angle.sin(),
    );

    let (sin_b, cos_b) = base_rad.sin_cos();
    let to_world = |(r, h): (f64, f64)| ToolPosition::new(r * cos_b, r * sin_b, h + links.base_height);

    ArmChain {
        base: to_world((0.0, 0.0)),
        shoulder: to_world(shoulder),
        elbow: to_world(elbow),
        wrist: to_world(wrist),
    }
}
