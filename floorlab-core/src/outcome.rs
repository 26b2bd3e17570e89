//! Outcome analyzer — terminal wealth per scenario and floor/cap summary
//! statistics.
//!
//! Statistics that no scenario qualifies for are reported as `None`, an
//! explicit "undefined" marker. Reporting 0.0 instead would read as "zero
//! shortfall risk", which is not what an empty breach set means.

use serde::{Deserialize, Serialize};

use crate::panel::Panel;

/// Terminal wealth per scenario: the cumulative product of `1 + r` over the
/// full time axis for one invested unit.
pub fn terminal_values(rets: &Panel) -> Vec<f64> {
    (0..rets.n_scenarios())
        .map(|s| {
            (0..rets.n_steps())
                .map(|t| 1.0 + rets.at(t, s))
                .product::<f64>()
        })
        .collect()
}

/// Summary of terminal outcomes across scenarios, per invested unit.
///
/// `None` fields are undefined: no scenario breached (or reached), so the
/// corresponding probability and conditional magnitude do not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSummary {
    /// Mean terminal wealth.
    pub mean: f64,
    /// Sample standard deviation (n−1) of terminal wealth.
    pub std: f64,
    /// Fraction of scenarios finishing below the floor.
    pub p_breach: Option<f64>,
    /// Mean of `floor − terminal` over breaching scenarios only.
    pub expected_shortfall: Option<f64>,
    /// Fraction of scenarios finishing at or above the cap.
    pub p_reach: Option<f64>,
    /// Mean of `cap − terminal` over reaching scenarios only (negative —
    /// reaching scenarios finish above the cap).
    pub expected_surplus: Option<f64>,
    /// Number of scenarios summarized.
    pub n_scenarios: usize,
}

/// Reduce a blended return panel to terminal-outcome statistics against a
/// floor and an optional cap (pass `f64::INFINITY` for no cap — nothing
/// reaches it, so the reach stats come back undefined).
pub fn summarize(rets: &Panel, floor: f64, cap: f64) -> TerminalSummary {
    let terminal = terminal_values(rets);
    let n = terminal.len();

    let breaching: Vec<f64> = terminal.iter().copied().filter(|&w| w < floor).collect();
    let reaching: Vec<f64> = terminal.iter().copied().filter(|&w| w >= cap).collect();

    let (p_breach, expected_shortfall) = if breaching.is_empty() {
        (None, None)
    } else {
        (
            Some(breaching.len() as f64 / n as f64),
            Some(mean(&breaching.iter().map(|w| floor - w).collect::<Vec<_>>())),
        )
    };
    let (p_reach, expected_surplus) = if reaching.is_empty() {
        (None, None)
    } else {
        (
            Some(reaching.len() as f64 / n as f64),
            Some(mean(&reaching.iter().map(|w| cap - w).collect::<Vec<_>>())),
        )
    };

    TerminalSummary {
        mean: mean(&terminal),
        std: sample_std(&terminal),
        p_breach,
        expected_shortfall,
        p_reach,
        expected_surplus,
        n_scenarios: n,
    }
}

/// Wealth/peak/drawdown decomposition of one return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthPath {
    /// Compounded wealth level at each step.
    pub wealth: Vec<f64>,
    /// Running maximum of the wealth level.
    pub peaks: Vec<f64>,
    /// `(wealth − peak) / peak` at each step; 0 at new highs, negative in
    /// drawdown.
    pub drawdowns: Vec<f64>,
}

/// Compound `start` dollars through one return series and track the
/// running peak and percentage drawdown.
pub fn wealth_path(returns: &[f64], start: f64) -> WealthPath {
    let mut wealth = Vec::with_capacity(returns.len());
    let mut peaks = Vec::with_capacity(returns.len());
    let mut drawdowns = Vec::with_capacity(returns.len());

    let mut level = start;
    let mut peak = f64::MIN;
    for &r in returns {
        level *= 1.0 + r;
        peak = peak.max(level);
        wealth.push(level);
        peaks.push(peak);
        drawdowns.push((level - peak) / peak);
    }
    WealthPath {
        wealth,
        peaks,
        drawdowns,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
