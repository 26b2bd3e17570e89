//! Discount-curve-floor CPPI: the floor is the present value of the target
//! under an externally supplied zero-coupon price panel.

use crate::engine::{run_floor_loop, FloorRule};
use crate::panel::{Panel, PanelError};
use crate::policy::Allocator;

/// CPPI with `floor_value(t) = floor × zc_prices[t]` — the price today of
/// the floor paid at the horizon, re-read fresh from the discount panel
/// each step rather than compounded from the policy's own account history.
///
/// Where the discount prices come from (a short-rate model, a fitted
/// curve) is the caller's business; this policy only requires that the
/// panel conform to the return panels.
#[derive(Debug, Clone)]
pub struct DiscountFloor {
    /// Floor as a fraction of the unit paid at the horizon.
    pub floor: f64,
    /// Cushion multiplier.
    pub multiplier: f64,
    /// T×N panel of zero-coupon bond prices.
    pub zc_prices: Panel,
}

impl DiscountFloor {
    pub fn new(floor: f64, multiplier: f64, zc_prices: Panel) -> Self {
        Self {
            floor,
            multiplier,
            zc_prices,
        }
    }
}

impl Allocator for DiscountFloor {
    fn name(&self) -> &str {
        "discount_floor"
    }

    fn allocate(&self, risky: &Panel, safe: &Panel) -> Result<Panel, PanelError> {
        run_floor_loop(
            risky,
            safe,
            self.multiplier,
            &FloorRule::DiscountCurve {
                floor: self.floor,
                zc_prices: &self.zc_prices,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_discount_enlarges_the_cushion() {
        // zc price 0.5 halves the present value of the floor, so the first
        // step's cushion is 1 - 0.8*0.5 = 0.6 and the raw weight 3*0.6
        // clamps to 1; at zc price 1.0 the cushion is 0.2 and the weight
        // 0.6.
        let risky = Panel::filled(1, 1, 0.0);
        let safe = Panel::filled(1, 1, 0.0);

        let deep = DiscountFloor::new(0.8, 3.0, Panel::filled(1, 1, 0.5));
        assert_eq!(deep.allocate(&risky, &safe).unwrap().at(0, 0), 1.0);

        let par = DiscountFloor::new(0.8, 3.0, Panel::filled(1, 1, 1.0));
        let w = par.allocate(&risky, &safe).unwrap().at(0, 0);
        assert!((w - 0.6).abs() < 1e-12);
    }

    #[test]
    fn mismatched_discount_panel_is_rejected() {
        let risky = Panel::filled(6, 4, 0.01);
        let safe = Panel::filled(6, 4, 0.0);
        let policy = DiscountFloor::new(0.8, 3.0, Panel::filled(5, 4, 0.9));
        let err = policy.allocate(&risky, &safe).unwrap_err();
        assert!(matches!(err, PanelError::ShapeMismatch { .. }));
    }

    #[test]
    fn floor_follows_the_discount_panel_not_the_account() {
        // With flat zero returns the account never moves, yet the weight
        // still changes as the zc price pulls the floor's present value up.
        let risky = Panel::filled(3, 1, 0.0);
        let safe = Panel::filled(3, 1, 0.0);
        let zc = Panel::new(3, 1, vec![0.90, 0.95, 1.0]).unwrap();
        let w = DiscountFloor::new(0.8, 3.0, zc)
            .allocate(&risky, &safe)
            .unwrap();
        assert!(w.at(0, 0) > w.at(1, 0));
        assert!(w.at(1, 0) > w.at(2, 0));
    }
}
