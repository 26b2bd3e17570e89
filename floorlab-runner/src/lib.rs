//! Simulation harness for the floorlab engine.
//!
//! The core crate is deliberately ignorant of where panels come from and
//! how runs are described. This crate supplies those pieces:
//!
//! - [`scenario`]: panel producers (GBM growth returns, flat safety rates,
//!   flat-term-structure discount prices)
//! - [`seeds`]: the deterministic seed hierarchy behind reproducible runs
//! - [`config`]: TOML-serializable run descriptions
//! - [`runner`]: the driver that evaluates every configured policy against
//!   one shared pair of panels

pub mod config;
pub mod runner;
pub mod scenario;
pub mod seeds;

pub use config::{ConfigError, PolicyConfig, SimulationConfig};
pub use runner::{render_table, run_simulation, PolicyOutcome, RunError, SimulationReport};
pub use scenario::{flat_discount_panel, flat_rate_panel, gbm_returns, GbmConfig};
pub use seeds::SeedHierarchy;
