//! Backtest harness — blend two return streams by a policy's weights.

use crate::panel::{Panel, PanelError};
use crate::policy::Allocator;

/// Backtest allocating between two sets of returns.
///
/// Validates that the panels conform, asks the policy for a weight panel,
/// verifies the policy honored its shape contract, and blends the streams
/// elementwise: `w·r1 + (1 − w)·r2`. The harness is policy-agnostic —
/// stateless broadcasts and path-dependent CPPI variants go through the
/// same path.
///
/// A shape violation aborts before the policy is invoked; a policy that
/// returns a non-conformant weight panel is a programming error surfaced
/// as [`PanelError::PolicyContract`], never retried.
pub fn mix(risky: &Panel, safe: &Panel, allocator: &dyn Allocator) -> Result<Panel, PanelError> {
    risky.ensure_same_shape(safe)?;
    let weights = allocator.allocate(risky, safe)?;
    if !weights.same_shape(risky) {
        return Err(PanelError::PolicyContract {
            policy: allocator.name().to_string(),
            expected: risky.shape(),
            got: weights.shape(),
        });
    }
    let blended = Panel::from_fn(risky.n_steps(), risky.n_scenarios(), |t, s| {
        let w = weights.at(t, s);
        w * risky.at(t, s) + (1.0 - w) * safe.at(t, s)
    });
    Ok(blended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FixedMix;

    #[test]
    fn all_risky_reproduces_risky_returns() {
        let risky = Panel::from_fn(6, 3, |t, s| 0.01 * (t as f64) - 0.002 * (s as f64));
        let safe = Panel::filled(6, 3, 0.004);
        let blended = mix(&risky, &safe, &FixedMix::new(1.0)).unwrap();
        assert_eq!(blended, risky);
    }

    #[test]
    fn all_safe_reproduces_safe_returns() {
        let risky = Panel::filled(6, 3, 0.08);
        let safe = Panel::from_fn(6, 3, |t, _| 0.001 * (t as f64));
        let blended = mix(&risky, &safe, &FixedMix::new(0.0)).unwrap();
        assert_eq!(blended, safe);
    }

    #[test]
    fn rejects_non_conformant_panels() {
        let risky = Panel::filled(12, 5, 0.0);
        let safe = Panel::filled(12, 4, 0.0);
        let err = mix(&risky, &safe, &FixedMix::new(0.5)).unwrap_err();
        assert_eq!(
            err,
            PanelError::ShapeMismatch {
                expected: (12, 5),
                got: (12, 4)
            }
        );
    }

    #[test]
    fn detects_policy_contract_violation() {
        /// Deliberately broken allocator: drops a scenario column.
        struct Truncating;
        impl Allocator for Truncating {
            fn name(&self) -> &str {
                "truncating"
            }
            fn allocate(&self, risky: &Panel, _safe: &Panel) -> Result<Panel, PanelError> {
                Ok(Panel::filled(risky.n_steps(), risky.n_scenarios() - 1, 0.5))
            }
        }

        let risky = Panel::filled(4, 3, 0.01);
        let safe = Panel::filled(4, 3, 0.0);
        let err = mix(&risky, &safe, &Truncating).unwrap_err();
        assert!(matches!(
            err,
            PanelError::PolicyContract { expected: (4, 3), got: (4, 2), .. }
        ));
    }

    #[test]
    fn half_and_half_blends_elementwise() {
        let risky = Panel::filled(2, 2, 0.10);
        let safe = Panel::filled(2, 2, 0.02);
        let blended = mix(&risky, &safe, &FixedMix::new(0.5)).unwrap();
        assert!((blended.at(1, 1) - 0.06).abs() < 1e-12);
    }
}
