//! Rebalancing engine — the time-stepped loop shared by the CPPI-family
//! policies, plus the full account-history backtest.

pub mod loop_runner;
pub mod state;

pub use loop_runner::{run_cppi, run_floor_loop, CppiConfig, CppiRun};
pub use state::{step, FloorRule, ScenarioState};
