//! Scenario generation — the panel producers the core treats as external
//! collaborators.
//!
//! Three producers: geometric Brownian motion return panels for the growth
//! asset, flat-rate panels for the safety asset, and flat-term-structure
//! zero-coupon price panels for the discount-curve floor. The core never
//! sees any of this machinery; it only receives the finished panels.

use rand::Rng;

use floorlab_core::panel::Panel;

/// Parameters for a geometric Brownian motion return panel.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GbmConfig {
    /// Simulation horizon in years.
    pub n_years: f64,
    /// Number of scenario columns.
    pub n_scenarios: usize,
    /// Annualized drift.
    pub mu: f64,
    /// Annualized volatility.
    pub sigma: f64,
    /// Simulation granularity (12 = monthly).
    pub steps_per_year: usize,
}

impl GbmConfig {
    /// Number of time steps the generated panel will have.
    pub fn n_steps(&self) -> usize {
        (self.n_years * self.steps_per_year as f64).round() as usize
    }
}

/// Generate a T×N panel of periodic returns under geometric Brownian
/// motion.
///
/// Per-step gross returns are `N((1+mu)^dt, sigma·sqrt(dt))` — the
/// compounding-consistent parameterization, so the expected terminal
/// wealth matches `(1+mu)^n_years` without discretization error.
pub fn gbm_returns(config: &GbmConfig, rng: &mut impl Rng) -> Panel {
    let dt = 1.0 / config.steps_per_year as f64;
    let loc = (1.0 + config.mu).powf(dt);
    let scale = config.sigma * dt.sqrt();
    let n_steps = config.n_steps();
    Panel::from_fn(n_steps, config.n_scenarios, |_, _| {
        loc + scale * standard_normal(rng) - 1.0
    })
}

/// Standard normal draw via the Box-Muller transform.
fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen();
    let u2: f64 = rng.gen();
    (-2.0 * u1.max(f64::MIN_POSITIVE).ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// A constant-return panel at `annual_rate / steps_per_year` per period —
/// the conventional stand-in for the safety asset.
pub fn flat_rate_panel(
    n_steps: usize,
    n_scenarios: usize,
    annual_rate: f64,
    steps_per_year: usize,
) -> Panel {
    Panel::filled(n_steps, n_scenarios, annual_rate / steps_per_year as f64)
}

/// Zero-coupon prices under a flat term structure: the price at step t of
/// one unit paid at the simulation horizon, `(1+r)^-(remaining years)`.
/// Prices rise toward par as the horizon approaches.
pub fn flat_discount_panel(
    n_steps: usize,
    n_scenarios: usize,
    annual_rate: f64,
    steps_per_year: usize,
) -> Panel {
    Panel::from_fn(n_steps, n_scenarios, |t, _| {
        let remaining_years = (n_steps - t) as f64 / steps_per_year as f64;
        (1.0 + annual_rate).powf(-remaining_years)
    })
}
