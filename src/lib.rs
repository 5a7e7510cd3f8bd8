//! Simulator core for the gem-cutting arm.
//!
//! Forward kinematics, joint-space trajectory planning and the cutting-pass
//! progress machine, exported to the dashboard through `wasm-bindgen`. The
//! page owns the clock: it calls [`ArmSimulator::tick`] with elapsed
//! milliseconds and reads back [`ArmSimulator::get_full_state`].

use serde::Serialize;
use std::collections::VecDeque;
use wasm_bindgen::prelude::*;

// --- LOGGING ---
#[cfg(target_arch = "wasm32")]
fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

#[cfg(not(target_arch = "wasm32"))]
fn log(_s: &str) {}
macro_rules! console_log {
    ($($t:tt)*) => (log(&format!($($t)*)))
}

pub mod config;
pub mod error;
pub mod kinematics;
pub mod pose;
pub mod progress;
pub mod trajectory;

pub use config::SimulatorConfig;
pub use error::{SimError, SimResult};
pub use kinematics::{ArmChain, LinkLengths, joint_chain, solve, solve_with};
pub use pose::{Joint, JointPose, ToolPosition};
pub use progress::{CuttingProgress, CuttingState, Ticker};
pub use trajectory::{Trajectory, plan};

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!(
            (a - b).abs() <= 1e-6,
            "expected {:.6}, got {:.6} (|diff|={:.6})",
            b,
            a,
            (a - b).abs()
        );
    }

    #[test]
    fn new_session_sits_at_home_and_ready() {
        let sim = ArmSimulator::new();
        assert_eq!(sim.pose(), JointPose::HOME);
        assert_eq!(sim.tool_position(), solve(&JointPose::HOME));
        assert_eq!(sim.cutting().state(), CuttingState::Ready);
        assert_eq!(sim.queued(), 0);

        let state = sim.state();
        assert_eq!(state.status, "Ready");
        assert_eq!(state.remaining_seconds, 50);
        assert_eq!(state.chain.tool(), state.tool);
    }

    #[test]
    fn joint_input_is_clamped_to_slider_range() {
        let mut sim = ArmSimulator::new();
        assert_eq!(sim.set_joint_named("elbow", 250.0), Ok(true));
        assert_eq!(sim.set_joint_named("base", -200.0), Ok(true));
        assert_eq!(sim.pose().elbow, 180.0);
        assert_eq!(sim.pose().base, -180.0);

        assert_eq!(
            sim.set_joint_named("thumb", 10.0),
            Err(SimError::UnknownJoint("thumb".to_string()))
        );
    }

    #[test]
    fn joint_input_is_locked_while_cutting() {
        let mut sim = ArmSimulator::new();
        assert!(sim.start_cutting());
        assert!(!sim.set_joint_angle(Joint::Wrist, 30.0));
        assert!(!sim.apply_pose(JointPose::new(10.0, 10.0, 10.0, 10.0)));
        assert_eq!(sim.pose(), JointPose::HOME);
    }

    #[test]
    fn fifty_ms_ticks_complete_a_pass_in_fifty_steps() {
        let mut sim = ArmSimulator::new();
        assert!(sim.start_cutting());
        assert!(!sim.start_cutting(), "second start must not double-schedule");

        for _ in 0..49 {
            sim.tick(50.0);
        }
        assert_eq!(sim.progress(), 98);
        assert!(sim.animating());

        sim.tick(50.0);
        assert_eq!(sim.progress(), 100);
        assert!(!sim.animating());
        assert_eq!(sim.state().status, "Complete");

        sim.tick(50.0);
        assert_eq!(sim.progress(), 100);
    }

    #[test]
    fn frame_sized_ticks_accumulate() {
        let mut sim = ArmSimulator::new();
        sim.start_cutting();
        // ~60 fps frames: 16ms each, 10 frames = 160ms = 3 ticks
        for _ in 0..10 {
            sim.tick(16.0);
        }
        assert_eq!(sim.progress(), 6);
    }

    #[test]
    fn reset_stops_progress_and_cancels_pending_time() {
        let mut sim = ArmSimulator::new();
        sim.start_cutting();
        let session = sim.session();
        sim.tick(500.0);
        assert_eq!(sim.progress(), 20);
        sim.tick(40.0); // partial interval pending

        sim.reset();
        assert_eq!(sim.progress(), 0);
        assert!(!sim.animating());

        // Leftover timer callbacks after reset do nothing.
        sim.tick(10.0);
        sim.tick(1000.0);
        assert!(!sim.tick_cutting(session));
        assert_eq!(sim.progress(), 0);
        assert_eq!(sim.state().status, "Ready");
    }

    #[test]
    fn reset_restores_home_pose_and_clears_queue() {
        let mut sim = ArmSimulator::new();
        sim.apply_pose(JointPose::new(10.0, 20.0, 30.0, 40.0));
        sim.queue_move(JointPose::new(90.0, 90.0, 0.0, 0.0), 10).unwrap();
        sim.tick(100.0);
        assert_eq!(sim.queued(), 8);

        sim.reset();
        assert_eq!(sim.pose(), JointPose::HOME);
        assert_eq!(sim.queued(), 0);
    }

    #[test]
    fn queued_move_plays_one_pose_per_tick() {
        let mut sim = ArmSimulator::new();
        let target = JointPose::new(90.0, 45.0, 90.0, -30.0);
        assert_eq!(sim.queue_move(target, 3), Ok(3));

        sim.tick(50.0);
        approx_eq(sim.pose().base, 30.0);
        approx_eq(sim.pose().wrist, -10.0);
        sim.tick(50.0);
        approx_eq(sim.pose().base, 60.0);
        sim.tick(50.0);
        assert_eq!(sim.pose(), target);
        assert_eq!(sim.queued(), 0);

        sim.tick(50.0);
        assert_eq!(sim.pose(), target);
        assert_eq!(sim.tool_position(), solve(&target));
    }

    #[test]
    fn queue_move_rejects_zero_steps() {
        let mut sim = ArmSimulator::new();
        assert_eq!(
            sim.queue_move(JointPose::default(), 0),
            Err(SimError::InvalidSteps { steps: 0 })
        );
        assert_eq!(sim.queued(), 0);
    }

    #[test]
    fn manual_pose_drops_queued_motion() {
        let mut sim = ArmSimulator::new();
        sim.queue_move(JointPose::new(90.0, 90.0, 90.0, 90.0), 5).unwrap();
        sim.set_joint_angle(Joint::Shoulder, 10.0);
        assert_eq!(sim.queued(), 0);
        sim.tick(50.0);
        assert_eq!(sim.pose().shoulder, 10.0);
    }

    #[test]
    fn queue_home_uses_configured_steps() {
        let cfg = SimulatorConfig { default_steps: 4, ..Default::default() };
        let mut sim = ArmSimulator::with_config(cfg).unwrap();
        sim.apply_pose(JointPose::new(100.0, 100.0, 100.0, 100.0));
        assert_eq!(sim.queue_home(), Ok(4));
        sim.tick(200.0);
        assert_eq!(sim.pose(), JointPose::HOME);
    }

    #[test]
    fn custom_config_changes_cadence() {
        let cfg = SimulatorConfig { tick_interval_ms: 100.0, progress_step: 10, ..Default::default() };
        let mut sim = ArmSimulator::with_config(cfg).unwrap();
        sim.start_cutting();
        sim.tick(250.0);
        assert_eq!(sim.progress(), 20);

        let bad = SimulatorConfig { progress_step: 0, ..Default::default() };
        assert!(matches!(ArmSimulator::with_config(bad), Err(SimError::InvalidConfig(_))));
    }
}

/// Snapshot handed to the dashboard after each frame.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorState {
    pub pose: JointPose,
    pub tool: ToolPosition,
    pub chain: ArmChain,
    pub progress: u32,
    pub animating: bool,
    pub cutting_state: CuttingState,
    pub status: String,
    pub remaining_seconds: u32,
    pub queued: usize,
    pub session: u32,
}

/// One simulator screen's worth of state.
#[wasm_bindgen]
pub struct ArmSimulator {
    pose: JointPose,
    config: SimulatorConfig,
    cutting: CuttingProgress,
    ticker: Ticker,
    // Interpolated poses still to play, one per tick.
    pending: VecDeque<JointPose>,
}

impl Default for ArmSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ArmSimulator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::build(SimulatorConfig::default())
    }

    /// Build from a plain JS object; omitted fields take their defaults.
    pub fn from_config(config: JsValue) -> Result<ArmSimulator, JsError> {
        let config: SimulatorConfig = if config.is_undefined() || config.is_null() {
            SimulatorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?
        };
        Ok(Self::with_config(config)?)
    }

    // ── Joint input ───────────────────────────────────────────────────────

    pub fn set_joint(&mut self, name: &str, degrees: f64) -> Result<bool, JsError> {
        Ok(self.set_joint_named(name, degrees)?)
    }

    pub fn set_pose(&mut self, pose: JsValue) -> Result<bool, JsError> {
        let pose: JointPose = serde_wasm_bindgen::from_value(pose)
            .map_err(|e| JsError::new(&format!("Invalid pose: {}", e)))?;
        Ok(self.apply_pose(pose))
    }

    pub fn get_pose(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.pose).unwrap_or(JsValue::NULL)
    }

    pub fn get_tool_position(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.tool_position()).unwrap_or(JsValue::NULL)
    }

    // ── Motion ────────────────────────────────────────────────────────────

    /// Queue a joint-space move to `target`; returns the number of poses queued.
    pub fn plan_move(&mut self, target: JsValue, steps: u32) -> Result<u32, JsError> {
        let target: JointPose = serde_wasm_bindgen::from_value(target)
            .map_err(|e| JsError::new(&format!("Invalid pose: {}", e)))?;
        Ok(self.queue_move(target, steps)? as u32)
    }

    pub fn plan_home(&mut self) -> Result<u32, JsError> {
        Ok(self.queue_home()? as u32)
    }

    // ── Cutting pass ──────────────────────────────────────────────────────

    /// Returns false if a pass is already running.
    pub fn start_cutting(&mut self) -> bool {
        if !self.cutting.start() {
            return false;
        }
        self.ticker.cancel();
        console_log!("Cutting pass started (session {})", self.cutting.session());
        true
    }

    /// Single progress step for a `setInterval` created during `session`.
    pub fn tick_cutting(&mut self, session: u32) -> bool {
        let was_running = self.cutting.animating();
        let changed = self.cutting.tick_session(session);
        if was_running && !self.cutting.animating() {
            console_log!("Cutting pass complete");
        }
        changed
    }

    pub fn progress(&self) -> u32 {
        self.cutting.progress()
    }

    pub fn animating(&self) -> bool {
        self.cutting.animating()
    }

    pub fn session(&self) -> u32 {
        self.cutting.session()
    }

    pub fn estimated_remaining_seconds(&self) -> u32 {
        self.cutting.estimated_remaining_seconds()
    }

    // ── Reset ─────────────────────────────────────────────────────────────

    pub fn reset(&mut self) {
        self.ticker.cancel();
        self.pending.clear();
        self.cutting.reset();
        self.pose = JointPose::HOME;
        console_log!("Simulator reset");
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    pub fn tick(&mut self, dt_ms: f64) {
        let due = self.ticker.advance(dt_ms);
        for _ in 0..due {
            if self.pending.is_empty() && !self.cutting.animating() {
                break;
            }
            if let Some(next) = self.pending.pop_front() {
                self.pose = next;
            }
            let session = self.cutting.session();
            self.tick_cutting(session);
        }
    }

    pub fn get_full_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state()).unwrap_or(JsValue::NULL)
    }
}

impl ArmSimulator {
    fn build(config: SimulatorConfig) -> Self {
        console_log!(
            "ArmSimulator ready: tick {}ms, step {}",
            config.tick_interval_ms,
            config.progress_step
        );
        Self {
            pose: JointPose::HOME,
            cutting: CuttingProgress::with_rate(config.progress_step, config.seconds_per_percent),
            ticker: Ticker::new(config.tick_interval_ms),
            pending: VecDeque::new(),
            config,
        }
    }

    pub fn with_config(config: SimulatorConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn pose(&self) -> JointPose {
        self.pose
    }

    pub fn cutting(&self) -> &CuttingProgress {
        &self.cutting
    }

    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    pub fn tool_position(&self) -> ToolPosition {
        solve(&self.pose)
    }

    pub fn joint_chain(&self) -> ArmChain {
        joint_chain(&self.pose)
    }

    /// Operator input for one joint. Ignored while a pass is running.
    pub fn set_joint_angle(&mut self, joint: Joint, degrees: f64) -> bool {
        if self.cutting.animating() {
            return false;
        }
        self.pending.clear();
        self.pose.set(joint, joint.clamp(degrees));
        true
    }

    pub fn set_joint_named(&mut self, name: &str, degrees: f64) -> SimResult<bool> {
        let joint: Joint = name.parse()?;
        Ok(self.set_joint_angle(joint, degrees))
    }

    /// Operator input for the whole pose. Ignored while a pass is running.
    pub fn apply_pose(&mut self, pose: JointPose) -> bool {
        if self.cutting.animating() {
            return false;
        }
        self.pending.clear();
        self.pose = pose.clamped();
        true
    }

    /// Replace any queued motion with a move from the current pose to
    /// `target`. The current pose itself is not queued.
    pub fn queue_move(&mut self, target: JointPose, steps: u32) -> SimResult<usize> {
        let trajectory = plan(&self.pose, &target, steps)?;
        self.pending.clear();
        self.pending.extend(trajectory.into_iter().skip(1));
        console_log!("Queued {} poses toward {:?}", self.pending.len(), target);
        Ok(self.pending.len())
    }

    pub fn queue_home(&mut self) -> SimResult<usize> {
        self.queue_move(JointPose::HOME, self.config.default_steps)
    }

    pub fn state(&self) -> SimulatorState {
        let cutting_state = self.cutting.state();
        SimulatorState {
            pose: self.pose,
            tool: self.tool_position(),
            chain: self.joint_chain(),
            progress: self.cutting.progress(),
            animating: self.cutting.animating(),
            cutting_state,
            status: cutting_state.label().to_string(),
            remaining_seconds: self.cutting.estimated_remaining_seconds(),
            queued: self.pending.len(),
            session: self.cutting.session(),
        }
    }
}

// ── Stateless helpers ──────────────────────────────────────────────────────

#[wasm_bindgen]
pub fn forward_kinematics(pose: JsValue) -> Result<JsValue, JsError> {
    let pose: JointPose = serde_wasm_bindgen::from_value(pose)
        .map_err(|e| JsError::new(&format!("Invalid pose: {}", e)))?;
    serde_wasm_bindgen::to_value(&solve(&pose)).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen]
pub fn calculate_trajectory(start: JsValue, end: JsValue, steps: u32) -> Result<JsValue, JsError> {
    let start: JointPose = serde_wasm_bindgen::from_value(start)
        .map_err(|e| JsError::new(&format!("Invalid start pose: {}", e)))?;
    let end: JointPose = serde_wasm_bindgen::from_value(end)
        .map_err(|e| JsError::new(&format!("Invalid end pose: {}", e)))?;
    let trajectory = plan(&start, &end, steps)?;
    serde_wasm_bindgen::to_value(&trajectory).map_err(|e| JsError::new(&e.to_string()))
}
