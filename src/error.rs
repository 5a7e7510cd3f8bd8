use thiserror::Error;

/// Errors reported by the simulator core.
///
/// Everything here is local to the caller: nothing is retried and nothing
/// is escalated. The JS bindings turn these into thrown `Error`s.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Trajectory planning needs at least one interpolation step
    #[error("trajectory needs at least 1 step, got {steps}")]
    InvalidSteps {
        /// The rejected step count.
        steps: u32,
    },

    /// Joint name not one of base/shoulder/elbow/wrist
    #[error("unknown joint: {0}")]
    UnknownJoint(String),

    /// Simulator configuration rejected by validation
    #[error("invalid simulator config: {0}")]
    InvalidConfig(String),
}

pub type SimResult<T> = Result<T, SimError>;
