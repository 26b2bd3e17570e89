//! Floorlab Core — panels, allocation policies, and the CPPI engine.
//!
//! This crate contains the heart of the allocation simulator:
//! - T×N return/weight panels with shape-conformance checking
//! - The `Allocator` trait with five concrete policies (fixed-mix,
//!   glidepath, and three CPPI floor variants)
//! - The shared rebalancing loop with a pure per-scenario step transition
//! - The `mix` backtest harness that blends two return streams by policy
//!   weights
//! - The outcome analyzer: terminal wealth and floor/cap summary stats
//!
//! The core consumes already-materialized panels and performs no I/O and
//! no randomness; scenario generation lives in `floorlab-runner`.

pub mod backtest;
pub mod engine;
pub mod outcome;
pub mod panel;
pub mod policy;

pub use backtest::mix;
pub use outcome::{summarize, terminal_values, TerminalSummary};
pub use panel::{Panel, PanelError};
pub use policy::Allocator;
