use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::progress::{DEFAULT_PROGRESS_STEP, DEFAULT_SECONDS_PER_PERCENT, DEFAULT_TICK_INTERVAL_MS, PROGRESS_MAX};

/// Timing knobs for one simulator session.
///
/// Arrives from JS as a (possibly partial) plain object; missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub tick_interval_ms: f64,
    pub progress_step: u32,
    pub seconds_per_percent: f64,
    pub default_steps: u32, // used when returning home
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            progress_step: DEFAULT_PROGRESS_STEP,
            seconds_per_percent: DEFAULT_SECONDS_PER_PERCENT,
            default_steps: 20,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !self.tick_interval_ms.is_finite() || self.tick_interval_ms <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "tick_interval_ms must be positive, got {}",
                self.tick_interval_ms
            )));
        }
        if self.progress_step == 0 || self.progress_step > PROGRESS_MAX {
            return Err(SimError::InvalidConfig(format!(
                "progress_step must be in 1..={}, got {}",
                PROGRESS_MAX, self.progress_step
            )));
        }
        if !self.seconds_per_percent.is_finite() || self.seconds_per_percent < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "seconds_per_percent must be a non-negative number, got {}",
                self.seconds_per_percent
            )));
        }
        if self.default_steps == 0 {
            return Err(SimError::InvalidConfig("default_steps must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Ticks a full pass takes at this step size.
    pub fn ticks_per_pass(&self) -> u32 {
        PROGRESS_MAX.div_ceil(self.progress_step.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_dashboard_timing() {
        let cfg = SimulatorConfig::default();
        assert_eq!(cfg.tick_interval_ms, 50.0);
        assert_eq!(cfg.progress_step, 2);
        assert_eq!(cfg.seconds_per_percent, 0.5);
        assert_eq!(cfg.ticks_per_pass(), 50);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            SimulatorConfig { tick_interval_ms: 0.0, ..Default::default() },
            SimulatorConfig { tick_interval_ms: f64::NAN, ..Default::default() },
            SimulatorConfig { progress_step: 0, ..Default::default() },
            SimulatorConfig { progress_step: 101, ..Default::default() },
            SimulatorConfig { seconds_per_percent: -1.0, ..Default::default() },
            SimulatorConfig { default_steps: 0, ..Default::default() },
        ];
        for cfg in bad {
            match cfg.validate() {
                Err(SimError::InvalidConfig(_)) => {}
                other => panic!("expected InvalidConfig for {cfg:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn partial_object_keeps_defaults() {
        let cfg: SimulatorConfig = serde_json::from_str(r#"{ "progress_step": 5 }"#).unwrap();
        assert_eq!(cfg.progress_step, 5);
        assert_eq!(cfg.tick_interval_ms, 50.0);
        assert_eq!(cfg.default_steps, 20);
        assert_eq!(cfg.ticks_per_pass(), 20);
    }

    #[test]
    fn ticks_per_pass_rounds_up() {
        let cfg = SimulatorConfig { progress_step: 3, ..Default::default() };
        assert_eq!(cfg.ticks_per_pass(), 34);
    }
}
