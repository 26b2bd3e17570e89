//! Per-scenario simulation state and the pure step transition.
//!
//! The rebalancing loop owns one [`ScenarioState`] per scenario column.
//! State is created at loop entry, advanced once per time step in strict
//! chronological order, and discarded when the weight panel is complete —
//! it never outlives a single policy evaluation.

use crate::panel::Panel;

/// Transient state for one scenario during one policy evaluation.
///
/// All values are on a unit-dollar basis: the account starts at 1.0 and the
/// floor/peak are expressed in the same units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioState {
    /// Current account value, compounded once per step.
    pub account_value: f64,
    /// Floor for the current step, refreshed by the active [`FloorRule`]
    /// before each transition.
    pub floor_value: f64,
    /// Running maximum of the account value. Only the drawdown rule reads
    /// it; the loop keeps it non-decreasing.
    pub peak_value: f64,
}

impl ScenarioState {
    /// Initial state: one dollar invested, floor and peak at the same level.
    pub fn unit() -> Self {
        Self {
            account_value: 1.0,
            floor_value: 1.0,
            peak_value: 1.0,
        }
    }
}

/// How the floor is computed at each step — the only thing the three
/// CPPI-family policies disagree on.
#[derive(Debug, Clone)]
pub enum FloorRule<'a> {
    /// Floor fixed at a fraction of the starting account value.
    ConstantFraction(f64),
    /// Floor is the present value of the target under today's term
    /// structure: `floor × zc_prices[step, scenario]`, re-read fresh each
    /// step rather than compounded from the account's own history.
    DiscountCurve { floor: f64, zc_prices: &'a Panel },
    /// Ratchet: floor is `(1 - max_drawdown) × peak`, so it can only rise
    /// as new highs are realized.
    Drawdown { max_drawdown: f64 },
}

impl FloorRule<'_> {
    /// Floor for `(step, scenario)` given the scenario's current state.
    pub fn floor_at(&self, step: usize, scenario: usize, state: &ScenarioState) -> f64 {
        match self {
            FloorRule::ConstantFraction(fraction) => *fraction,
            FloorRule::DiscountCurve { floor, zc_prices } => {
                floor * zc_prices.at(step, scenario)
            }
            FloorRule::Drawdown { max_drawdown } => (1.0 - max_drawdown) * state.peak_value,
        }
    }

    /// Whether the loop must maintain the running peak after compounding.
    pub fn tracks_peak(&self) -> bool {
        matches!(self, FloorRule::Drawdown { .. })
    }
}

/// Advance one scenario by one period.
///
/// Risk budgeting: the cushion is the fraction of current wealth above the
/// floor; a multiple of it goes to the risky asset, clamped into [0, 1]
/// (no leverage, no short). The account then compounds at the realized
/// blended return. Returns the new state and the risky weight that was
/// applied.
///
/// Pure function of its inputs — one transition can be tested in isolation
/// and scenarios can run on any schedule without sharing state.
pub fn step(
    state: ScenarioState,
    multiplier: f64,
    risky_ret: f64,
    safe_ret: f64,
) -> (ScenarioState, f64) {
    let cushion = (state.account_value - state.floor_value) / state.account_value;
    let risky_w = (multiplier * cushion).clamp(0.0, 1.0);
    let safe_w = 1.0 - risky_w;
    let risky_alloc = state.account_value * risky_w;
    let safe_alloc = state.account_value * safe_w;
    let account_value = risky_alloc * (1.0 + risky_ret) + safe_alloc * (1.0 + safe_ret);
    (
        ScenarioState {
            account_value,
            ..state
        },
        risky_w,
    )
}
