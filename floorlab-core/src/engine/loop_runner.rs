//! The shared rebalancing loop.
//!
//! All three floor-based policies run the same time-stepped loop and differ
//! only in the [`FloorRule`] they plug in. The loop is strictly sequential
//! along the time axis — step t needs the state step t-1 produced — but
//! scenario columns never read each other's state, so the outer scenario
//! loop can be parallelized without touching the transition logic.
//!
//! Floors are evaluated once per step, not continuously. A loss realized
//! within a single step can therefore leave the account below the nominal
//! floor even though the weight for that step respected it. This is an
//! accepted discrete-time approximation; the loop does not clamp the
//! account back up after the fact, and tests pin that behavior down.

use crate::engine::state::{step, FloorRule, ScenarioState};
use crate::panel::{Panel, PanelError};

/// Run the CPPI-family loop over conformant risky/safe panels and return
/// the risky-weight panel (same shape, every entry in [0, 1]).
///
/// For the discount-curve rule the discount panel must also conform to the
/// return panels; a mismatch aborts before any state is created.
pub fn run_floor_loop(
    risky: &Panel,
    safe: &Panel,
    multiplier: f64,
    rule: &FloorRule,
) -> Result<Panel, PanelError> {
    risky.ensure_same_shape(safe)?;
    if let FloorRule::DiscountCurve { zc_prices, .. } = rule {
        risky.ensure_same_shape(zc_prices)?;
    }

    let (n_steps, n_scenarios) = risky.shape();
    let mut weights = vec![0.0; n_steps * n_scenarios];

    for scenario in 0..n_scenarios {
        let mut state = ScenarioState::unit();
        for t in 0..n_steps {
            state.floor_value = rule.floor_at(t, scenario, &state);
            let (next, risky_w) = step(state, multiplier, risky.at(t, scenario), safe.at(t, scenario));
            state = next;
            if rule.tracks_peak() {
                state.peak_value = state.peak_value.max(state.account_value);
            }
            weights[t * n_scenarios + scenario] = risky_w;
        }
    }

    Panel::new(n_steps, n_scenarios, weights)
}

/// Configuration for a full CPPI account backtest.
#[derive(Debug, Clone)]
pub struct CppiConfig {
    /// Cushion multiplier.
    pub multiplier: f64,
    /// Starting account value in dollars.
    pub start: f64,
    /// Floor as a fraction of the starting value (ignored when `drawdown`
    /// is set — the ratchet floor takes over).
    pub floor: f64,
    /// Annualized rate used to synthesize the safe leg when none is given.
    pub riskfree_rate: f64,
    /// Periods per year, for converting `riskfree_rate` to a per-step rate.
    pub steps_per_year: usize,
    /// When set, the floor becomes `(1 - drawdown) × running peak`.
    pub drawdown: Option<f64>,
}

impl Default for CppiConfig {
    fn default() -> Self {
        Self {
            multiplier: 3.0,
            start: 1000.0,
            floor: 0.8,
            riskfree_rate: 0.03,
            steps_per_year: 12,
            drawdown: None,
        }
    }
}

/// Full history of one CPPI backtest, panel per tracked quantity.
#[derive(Debug, Clone)]
pub struct CppiRun {
    /// Account value after each step (dollars).
    pub wealth: Panel,
    /// Cushion (risk budget) observed at each step, before compounding.
    pub cushion: Panel,
    /// Risky weight applied at each step.
    pub risky_weight: Panel,
    /// Floor in force at each step (dollars).
    pub floor_value: Panel,
    /// Buy-and-hold wealth of the risky asset alone, for comparison.
    pub risky_wealth: Panel,
}

/// Run the CPPI strategy against a risky return panel, recording the full
/// account, cushion, weight, and floor histories.
///
/// When `safe` is `None` a flat panel at `riskfree_rate / steps_per_year`
/// per period stands in for the safety asset. The same discrete-time
/// caveat as [`run_floor_loop`] applies: terminal wealth can finish below
/// `start × floor` when a single step's loss overwhelms the cushion.
pub fn run_cppi(
    risky: &Panel,
    safe: Option<&Panel>,
    config: &CppiConfig,
) -> Result<CppiRun, PanelError> {
    let (n_steps, n_scenarios) = risky.shape();
    let default_safe;
    let safe = match safe {
        Some(panel) => {
            risky.ensure_same_shape(panel)?;
            panel
        }
        None => {
            default_safe = Panel::filled(
                n_steps,
                n_scenarios,
                config.riskfree_rate / config.steps_per_year as f64,
            );
            &default_safe
        }
    };

    let mut wealth = vec![0.0; n_steps * n_scenarios];
    let mut cushion_hist = vec![0.0; n_steps * n_scenarios];
    let mut weight_hist = vec![0.0; n_steps * n_scenarios];
    let mut floor_hist = vec![0.0; n_steps * n_scenarios];

    for scenario in 0..n_scenarios {
        let mut account_value = config.start;
        let mut floor_value = config.start * config.floor;
        let mut peak = config.start;

        for t in 0..n_steps {
            if let Some(maxdd) = config.drawdown {
                peak = peak.max(account_value);
                floor_value = peak * (1.0 - maxdd);
            }
            let cushion = (account_value - floor_value) / account_value;
            let risky_w = (config.multiplier * cushion).clamp(0.0, 1.0);
            let safe_w = 1.0 - risky_w;
            let risky_alloc = account_value * risky_w;
            let safe_alloc = account_value * safe_w;
            account_value = risky_alloc * (1.0 + risky.at(t, scenario))
                + safe_alloc * (1.0 + safe.at(t, scenario));

            let idx = t * n_scenarios + scenario;
            wealth[idx] = account_value;
            cushion_hist[idx] = cushion;
            weight_hist[idx] = risky_w;
            floor_hist[idx] = floor_value;
        }
    }

    Ok(CppiRun {
        wealth: Panel::new(n_steps, n_scenarios, wealth)?,
        cushion: Panel::new(n_steps, n_scenarios, cushion_hist)?,
        risky_weight: Panel::new(n_steps, n_scenarios, weight_hist)?,
        floor_value: Panel::new(n_steps, n_scenarios, floor_hist)?,
        risky_wealth: risky.wealth_index(config.start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_floor_pins_weight_at_clamped_multiplier() {
        // floor = 0 → cushion is always 1 → weight is clip(m, 0, 1).
        let risky = Panel::filled(6, 4, 0.02);
        let safe = Panel::filled(6, 4, 0.005);
        let weights =
            run_floor_loop(&risky, &safe, 3.0, &FloorRule::ConstantFraction(0.0)).unwrap();
        for t in 0..6 {
            for s in 0..4 {
                assert_eq!(weights.at(t, s), 1.0);
            }
        }
    }

    #[test]
    fn discount_rule_requires_conformant_zc_panel() {
        let risky = Panel::filled(6, 4, 0.01);
        let safe = Panel::filled(6, 4, 0.0);
        let zc = Panel::filled(6, 3, 0.9);
        let rule = FloorRule::DiscountCurve {
            floor: 0.8,
            zc_prices: &zc,
        };
        let err = run_floor_loop(&risky, &safe, 3.0, &rule).unwrap_err();
        assert!(matches!(err, PanelError::ShapeMismatch { .. }));
    }

    #[test]
    fn run_cppi_synthesizes_flat_safe_leg() {
        // All-zero risky returns with floor 0.8, m = 3: weight starts at
        // 0.6, the safe 40% earns 3%/12 per step, so the account grows.
        let risky = Panel::filled(3, 2, 0.0);
        let run = run_cppi(&risky, None, &CppiConfig::default()).unwrap();
        let first = run.wealth.at(0, 0);
        let expected = 1000.0 * (0.6 + 0.4 * 1.0025);
        assert!((first - expected).abs() < 1e-9);
        assert!(run.wealth.at(2, 0) > first);
        // Histories share the input shape.
        assert_eq!(run.cushion.shape(), (3, 2));
        assert_eq!(run.risky_weight.shape(), (3, 2));
        assert_eq!(run.floor_value.shape(), (3, 2));
    }

    #[test]
    fn run_cppi_drawdown_floor_ratchets_with_peak() {
        // One strong up-step lifts the peak, which lifts the floor.
        let risky = Panel::from_series(&[0.20, 0.0, 0.0]);
        let config = CppiConfig {
            drawdown: Some(0.25),
            riskfree_rate: 0.0,
            ..CppiConfig::default()
        };
        let run = run_cppi(&risky, None, &config).unwrap();
        assert_eq!(run.floor_value.at(0, 0), 750.0);
        let floor_after = run.floor_value.at(1, 0);
        assert!(
            floor_after > 750.0,
            "floor should ratchet up after a new peak, got {floor_after}"
        );
        // And it never comes back down.
        assert!(run.floor_value.at(2, 0) >= floor_after);
    }

    #[test]
    fn run_cppi_rejects_mismatched_safe_panel() {
        let risky = Panel::filled(4, 3, 0.01);
        let safe = Panel::filled(4, 2, 0.0);
        let err = run_cppi(&risky, Some(&safe), &CppiConfig::default()).unwrap_err();
        assert!(matches!(err, PanelError::ShapeMismatch { .. }));
    }
}
