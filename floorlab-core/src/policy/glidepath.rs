//! Glidepath allocation: target-date-fund style linear de-risking.

use crate::panel::{Panel, PanelError};
use crate::policy::Allocator;

/// Risky weight interpolates linearly from `start_glide` at the first step
/// to `end_glide` at the last, identical across scenarios at a given step.
/// A pure function of time — no per-scenario state.
#[derive(Debug, Clone, Copy)]
pub struct Glidepath {
    start_glide: f64,
    end_glide: f64,
}

impl Glidepath {
    /// Endpoints are clamped into [0, 1]; the interpolation then stays in
    /// range by construction.
    pub fn new(start_glide: f64, end_glide: f64) -> Self {
        Self {
            start_glide: start_glide.clamp(0.0, 1.0),
            end_glide: end_glide.clamp(0.0, 1.0),
        }
    }
}

impl Allocator for Glidepath {
    fn name(&self) -> &str {
        "glidepath"
    }

    fn allocate(&self, risky: &Panel, safe: &Panel) -> Result<Panel, PanelError> {
        risky.ensure_same_shape(safe)?;
        let (n_steps, n_scenarios) = risky.shape();
        // A single-step panel has no span to interpolate over; it gets the
        // starting weight.
        let span = (n_steps.saturating_sub(1)).max(1) as f64;
        Ok(Panel::from_fn(n_steps, n_scenarios, |t, _| {
            let frac = t as f64 / span;
            self.start_glide + (self.end_glide - self.start_glide) * frac
        }))
    }
}
