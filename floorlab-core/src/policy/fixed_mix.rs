//! Fixed-mix allocation: one constant risky weight, broadcast everywhere.

use crate::panel::{Panel, PanelError};
use crate::policy::Allocator;

/// Allocate a constant fraction `w1` to the risky asset at every step and
/// scenario. Stateless — the returned panel is a pure broadcast.
#[derive(Debug, Clone, Copy)]
pub struct FixedMix {
    w1: f64,
}

impl FixedMix {
    /// `w1` is clamped into [0, 1] to honor the no-leverage/no-short
    /// postcondition.
    pub fn new(w1: f64) -> Self {
        Self {
            w1: w1.clamp(0.0, 1.0),
        }
    }

    pub fn w1(&self) -> f64 {
        self.w1
    }
}

impl Allocator for FixedMix {
    fn name(&self) -> &str {
        "fixed_mix"
    }

    fn allocate(&self, risky: &Panel, safe: &Panel) -> Result<Panel, PanelError> {
        risky.ensure_same_shape(safe)?;
        let (n_steps, n_scenarios) = risky.shape();
        Ok(Panel::filled(n_steps, n_scenarios, self.w1))
    }
}
