//! Serializable simulation configuration, loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::GbmConfig;

/// Errors from loading or validating a simulation config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One allocation policy to evaluate, as a tagged TOML table.
///
/// The discount-floor variant names no discount panel here: the runner
/// supplies the flat-term-structure panel it builds from `safe_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyConfig {
    /// Constant risky weight.
    FixedMix { w1: f64 },

    /// Linear schedule from `start_glide` to `end_glide`.
    Glidepath { start_glide: f64, end_glide: f64 },

    /// CPPI against a fixed floor fraction.
    ConstantFloor { floor: f64, multiplier: f64 },

    /// CPPI against the present value of the floor under the runner's flat
    /// term structure.
    DiscountFloor { floor: f64, multiplier: f64 },

    /// CPPI against a peak-ratcheted drawdown floor.
    DrawdownFloor { max_drawdown: f64, multiplier: f64 },
}

impl PolicyConfig {
    /// Label used in report rows and tables, carrying the key parameters.
    pub fn describe(&self) -> String {
        match self {
            PolicyConfig::FixedMix { w1 } => format!("fixed_mix(w1={w1:.2})"),
            PolicyConfig::Glidepath {
                start_glide,
                end_glide,
            } => format!("glidepath({start_glide:.2}->{end_glide:.2})"),
            PolicyConfig::ConstantFloor { floor, multiplier } => {
                format!("constant_floor(f={floor:.2}, m={multiplier:.1})")
            }
            PolicyConfig::DiscountFloor { floor, multiplier } => {
                format!("discount_floor(f={floor:.2}, m={multiplier:.1})")
            }
            PolicyConfig::DrawdownFloor {
                max_drawdown,
                multiplier,
            } => format!("drawdown_floor(dd={max_drawdown:.2}, m={multiplier:.1})"),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        match *self {
            PolicyConfig::FixedMix { w1 } => {
                if !(0.0..=1.0).contains(&w1) {
                    return invalid(format!("fixed_mix w1 must be in [0,1], got {w1}"));
                }
            }
            PolicyConfig::Glidepath {
                start_glide,
                end_glide,
            } => {
                for (name, v) in [("start_glide", start_glide), ("end_glide", end_glide)] {
                    if !(0.0..=1.0).contains(&v) {
                        return invalid(format!("glidepath {name} must be in [0,1], got {v}"));
                    }
                }
            }
            PolicyConfig::ConstantFloor { floor, multiplier }
            | PolicyConfig::DiscountFloor { floor, multiplier } => {
                if floor < 0.0 {
                    return invalid(format!("floor must be non-negative, got {floor}"));
                }
                if multiplier <= 0.0 {
                    return invalid(format!("multiplier must be positive, got {multiplier}"));
                }
            }
            PolicyConfig::DrawdownFloor {
                max_drawdown,
                multiplier,
            } => {
                if !(0.0..1.0).contains(&max_drawdown) || max_drawdown == 0.0 {
                    return invalid(format!(
                        "max_drawdown must be in (0,1), got {max_drawdown}"
                    ));
                }
                if multiplier <= 0.0 {
                    return invalid(format!("multiplier must be positive, got {multiplier}"));
                }
            }
        }
        Ok(())
    }
}

/// Complete configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Growth-asset scenario generator parameters.
    pub scenario: GbmConfig,
    /// Master seed for the deterministic seed hierarchy.
    pub seed: u64,
    /// Annualized rate for the safety asset and the flat term structure.
    pub safe_rate: f64,
    /// Floor threshold for the outcome analyzer, per invested unit.
    pub floor: f64,
    /// Optional cap threshold; absent means no cap (reach stats undefined).
    pub cap: Option<f64>,
    /// Policies to evaluate against the same panels.
    pub policies: Vec<PolicyConfig>,
}

impl SimulationConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: SimulationConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.scenario.n_scenarios == 0 {
            return invalid("scenario.n_scenarios must be positive".into());
        }
        if self.scenario.steps_per_year == 0 {
            return invalid("scenario.steps_per_year must be positive".into());
        }
        if self.scenario.n_years <= 0.0 {
            return invalid(format!(
                "scenario.n_years must be positive, got {}",
                self.scenario.n_years
            ));
        }
        if self.scenario.sigma < 0.0 {
            return invalid(format!(
                "scenario.sigma must be non-negative, got {}",
                self.scenario.sigma
            ));
        }
        if self.floor < 0.0 {
            return invalid(format!("floor must be non-negative, got {}", self.floor));
        }
        if let Some(cap) = self.cap {
            if cap <= self.floor {
                return invalid(format!(
                    "cap ({cap}) must exceed the floor ({})",
                    self.floor
                ));
            }
        }
        if self.policies.is_empty() {
            return invalid("at least one policy is required".into());
        }
        for policy in &self.policies {
            policy.validate()?;
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    /// Ten years of monthly scenarios with the classic course parameters
    /// and all five policy families.
    fn default() -> Self {
        Self {
            scenario: GbmConfig {
                n_years: 10.0,
                n_scenarios: 1000,
                mu: 0.07,
                sigma: 0.15,
                steps_per_year: 12,
            },
            seed: 42,
            safe_rate: 0.03,
            floor: 0.8,
            cap: None,
            policies: vec![
                PolicyConfig::FixedMix { w1: 0.6 },
                PolicyConfig::Glidepath {
                    start_glide: 1.0,
                    end_glide: 0.0,
                },
                PolicyConfig::ConstantFloor {
                    floor: 0.8,
                    multiplier: 3.0,
                },
                PolicyConfig::DiscountFloor {
                    floor: 0.8,
                    multiplier: 3.0,
                },
                PolicyConfig::DrawdownFloor {
                    max_drawdown: 0.25,
                    multiplier: 3.0,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn toml_round_trip() {
        let config = SimulationConfig::default();
        let text = toml::to_string(&config).unwrap();
        let back: SimulationConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn parses_tagged_policy_tables() {
        let text = r#"
            seed = 7
            safe_rate = 0.03
            floor = 0.8

            [scenario]
            n_years = 5.0
            n_scenarios = 100
            mu = 0.06
            sigma = 0.12
            steps_per_year = 12

            [[policies]]
            type = "FIXED_MIX"
            w1 = 0.7

            [[policies]]
            type = "DRAWDOWN_FLOOR"
            max_drawdown = 0.2
            multiplier = 4.0
        "#;
        let config: SimulationConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();
        assert_eq!(config.policies.len(), 2);
        assert_eq!(config.policies[0], PolicyConfig::FixedMix { w1: 0.7 });
        assert_eq!(config.cap, None);
    }

    #[test]
    fn rejects_empty_policy_list() {
        let config = SimulationConfig {
            policies: vec![],
            ..SimulationConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        let mut config = SimulationConfig::default();
        config.policies = vec![PolicyConfig::FixedMix { w1: 1.2 }];
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.policies = vec![PolicyConfig::DrawdownFloor {
            max_drawdown: 1.0,
            multiplier: 3.0,
        }];
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.cap = Some(0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn describe_labels_carry_parameters() {
        let label = PolicyConfig::ConstantFloor {
            floor: 0.8,
            multiplier: 3.0,
        }
        .describe();
        assert_eq!(label, "constant_floor(f=0.80, m=3.0)");
    }
}
