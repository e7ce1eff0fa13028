use crate::scheduler::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidTemperature(f64),
    InvalidCoolingRate(f64),
    ZeroIterations,
    /// SA cannot seed itself.
    InvalidRefineSource(Algorithm),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTemperature(t) => {
                write!(f, "initial temperature must be positive and finite, got {}", t)
            }
            ConfigError::InvalidCoolingRate(a) => {
                write!(f, "cooling rate must lie strictly between 0 and 1, got {}", a)
            }
            ConfigError::ZeroIterations => write!(f, "iteration budget must be positive"),
            ConfigError::InvalidRefineSource(a) => {
                write!(f, "annealing must start from Greedy or DSATUR, got {}", a)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Simulated annealing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub max_iters: usize,
    pub seed: u64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            cooling_rate: 0.995,
            max_iters: 10_000,
            seed: 42,
        }
    }
}

impl AnnealingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(ConfigError::InvalidTemperature(self.initial_temperature));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(ConfigError::InvalidCoolingRate(self.cooling_rate));
        }
        if self.max_iters == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

/// Settings for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub algorithm: Algorithm,
    /// Coloring handed to simulated annealing as its starting state.
    pub refine_from: Algorithm,
    pub annealing: AnnealingConfig,
    /// Seed for the room inventory shuffle.
    pub room_seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Dsatur,
            refine_from: Algorithm::Greedy,
            annealing: AnnealingConfig::default(),
            room_seed: 42,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refine_from == Algorithm::SimulatedAnnealing {
            return Err(ConfigError::InvalidRefineSource(self.refine_from));
        }
        self.annealing.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AnnealingConfig::default().validate().is_ok());
        assert!(SchedulerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_annealing_bounds() {
        let bad_t = AnnealingConfig {
            initial_temperature: 0.0,
            ..Default::default()
        };
        assert_eq!(bad_t.validate(), Err(ConfigError::InvalidTemperature(0.0)));

        let nan_t = AnnealingConfig {
            initial_temperature: f64::NAN,
            ..Default::default()
        };
        assert!(nan_t.validate().is_err());

        for alpha in [0.0, 1.0, 1.5, -0.1] {
            let cfg = AnnealingConfig {
                cooling_rate: alpha,
                ..Default::default()
            };
            assert_eq!(cfg.validate(), Err(ConfigError::InvalidCoolingRate(alpha)));
        }

        let no_iters = AnnealingConfig {
            max_iters: 0,
            ..Default::default()
        };
        assert_eq!(no_iters.validate(), Err(ConfigError::ZeroIterations));
    }

    #[test]
    fn test_refine_source_rejects_annealing() {
        let cfg = SchedulerConfig {
            refine_from: Algorithm::SimulatedAnnealing,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRefineSource(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: SchedulerConfig =
            serde_json::from_str(r#"{"algorithm": "Greedy", "annealing": {"max_iters": 50}}"#)
                .unwrap();
        assert_eq!(cfg.algorithm, Algorithm::Greedy);
        assert_eq!(cfg.annealing.max_iters, 50);
        assert_eq!(cfg.annealing.cooling_rate, 0.995);
        assert_eq!(cfg.room_seed, 42);
    }
}
