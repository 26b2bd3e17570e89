//! Allocation policies — everything that turns two return panels into a
//! risky-weight panel.
//!
//! Every policy implements one trait and carries only its own
//! configuration. The backtest harness and the rebalancing engine are
//! written once against the trait; they do not know which variants are
//! stateless broadcasts and which are path-dependent.
//!
//! ## Concrete implementations
//!
//! - [`FixedMix`] — constant risky weight, broadcast everywhere
//! - [`Glidepath`] — linear schedule from a start weight to an end weight
//! - [`ConstantFloor`] — CPPI against a fixed floor
//! - [`DiscountFloor`] — CPPI against the present value of the floor under
//!   an externally supplied discount-factor panel
//! - [`DrawdownFloor`] — CPPI against a peak-ratcheted drawdown floor

pub mod constant_floor;
pub mod discount_floor;
pub mod drawdown_floor;
pub mod fixed_mix;
pub mod glidepath;

pub use constant_floor::ConstantFloor;
pub use discount_floor::DiscountFloor;
pub use drawdown_floor::DrawdownFloor;
pub use fixed_mix::FixedMix;
pub use glidepath::Glidepath;

use crate::panel::{Panel, PanelError};

/// Trait for allocation policies.
///
/// # Contract
/// - Inputs are conformant T×N return panels (risky, safe); the harness
///   checks this before calling, panel-consuming policies re-check their
///   own extra inputs.
/// - The returned weight panel has the same shape as the inputs and every
///   entry lies in [0, 1] — no leverage, no short positions.
pub trait Allocator: Send + Sync {
    /// Human-readable name (e.g., "fixed_mix", "drawdown_floor").
    fn name(&self) -> &str;

    /// Produce the risky-asset weight for every step and scenario.
    fn allocate(&self, risky: &Panel, safe: &Panel) -> Result<Panel, PanelError>;
}
