//! Drawdown-floor CPPI: the floor ratchets up with the realized peak,
//! enforcing a maximum permitted drawdown from any high-water mark.

use crate::engine::{run_floor_loop, FloorRule};
use crate::panel::{Panel, PanelError};
use crate::policy::Allocator;

/// CPPI with `floor_value(t) = (1 - max_drawdown) × peak(t)`, where peak is
/// the running maximum of the account value. The floor can only rise, so
/// gains are locked in: after a new high, the policy will not tolerate more
/// than `max_drawdown` of giveback before fully de-risking.
#[derive(Debug, Clone, Copy)]
pub struct DrawdownFloor {
    /// Maximum tolerated drawdown from the peak, in (0, 1).
    pub max_drawdown: f64,
    /// Cushion multiplier.
    pub multiplier: f64,
}

impl DrawdownFloor {
    pub fn new(max_drawdown: f64, multiplier: f64) -> Self {
        Self {
            max_drawdown,
            multiplier,
        }
    }
}

impl Allocator for DrawdownFloor {
    fn name(&self) -> &str {
        "drawdown_floor"
    }

    fn allocate(&self, risky: &Panel, safe: &Panel) -> Result<Panel, PanelError> {
        run_floor_loop(
            risky,
            safe,
            self.multiplier,
            &FloorRule::Drawdown {
                max_drawdown: self.max_drawdown,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_gains_keep_cushion_and_weight_constant() {
        // When the account closes each step at a new peak, the cushion is
        // pinned at max_drawdown, so the weight is clip(m × maxdd, 0, 1).
        let risky = Panel::filled(6, 1, 0.05);
        let safe = Panel::filled(6, 1, 0.05);
        let w = DrawdownFloor::new(0.25, 3.0).allocate(&risky, &safe).unwrap();
        for t in 0..6 {
            assert!(
                (w.at(t, 0) - 0.75).abs() < 1e-12,
                "expected 0.75 at step {t}, got {}",
                w.at(t, 0)
            );
        }
    }

    #[test]
    fn losses_below_peak_shrink_the_weight() {
        // A gain sets a high-water mark; the following losses pull the
        // account toward the ratcheted floor and the weight drops.
        let risky = Panel::from_series(&[0.20, -0.10, -0.10, -0.10]);
        let safe = Panel::filled(4, 1, 0.0);
        let w = DrawdownFloor::new(0.25, 3.0).allocate(&risky, &safe).unwrap();
        assert!(w.at(1, 0) <= w.at(0, 0) + 1e-12);
        assert!(w.at(2, 0) < w.at(1, 0));
        assert!(w.at(3, 0) < w.at(2, 0));
    }

    #[test]
    fn weights_stay_in_bounds_through_violent_swings() {
        let risky = Panel::from_series(&[0.5, -0.6, 0.8, -0.7, 0.4]);
        let safe = Panel::filled(5, 1, 0.001);
        let w = DrawdownFloor::new(0.2, 5.0).allocate(&risky, &safe).unwrap();
        for t in 0..5 {
            let v = w.at(t, 0);
            assert!((0.0..=1.0).contains(&v), "weight {v} out of [0,1] at step {t}");
        }
    }
}
