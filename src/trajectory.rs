//! Joint-space trajectory planning.
//!
//! Each joint is interpolated linearly on its raw angle. There is no
//! shortest-path wrapping, so 170° -> -170° sweeps back through 0°.

use serde::Serialize;

use crate::error::{SimError, SimResult};
use crate::kinematics;
use crate::pose::{JointPose, ToolPosition};

/// Interpolated poses from a start pose to an end pose, both included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    poses: Vec<JointPose>,
}

impl Trajectory {
    pub fn poses(&self) -> &[JointPose] {
        &self.poses
    }

    pub fn into_poses(self) -> Vec<JointPose> {
        self.poses
    }

    /// Always `steps + 1`, never zero.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn steps(&self) -> u32 {
        (self.poses.len() - 1) as u32
    }

    pub fn first(&self) -> JointPose {
        self.poses[0]
    }

    pub fn last(&self) -> JointPose {
        self.poses[self.poses.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JointPose> {
        self.poses.iter()
    }

    /// Same samples walked end to start.
    pub fn reversed(&self) -> Trajectory {
        let mut poses = self.poses.clone();
        poses.reverse();
        Trajectory { poses }
    }

    /// Tool-tip position of every sample on the gem-cutting arm.
    pub fn tool_path(&self) -> Vec<ToolPosition> {
        self.poses.iter().map(kinematics::solve).collect()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a JointPose;
    type IntoIter = std::slice::Iter<'a, JointPose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}

impl IntoIterator for Trajectory {
    type Item = JointPose;
    type IntoIter = std::vec::IntoIter<JointPose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.into_iter()
    }
}

/// Plan `steps + 1` poses from `start` to `end`.
///
/// Sample `i` sits at `t = i / steps`. The endpoints are copied rather than
/// computed so they match `start` and `end` bit for bit.
pub fn plan(start: &JointPose, end: &JointPose, steps: u32) -> SimResult<Trajectory> {
    if steps < 1 {
        return Err(SimError::InvalidSteps { steps });
    }

    let mut poses = Vec::with_capacity(steps as usize + 1);
    poses.push(*start);
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        poses.push(start.lerp(end, t));
    }
    poses.push(*end);

    Ok(Trajectory { poses })
}
