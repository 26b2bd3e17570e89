//! Constant-floor CPPI: risk budget against a floor fixed at a fraction of
//! the starting account value.

use crate::engine::{run_floor_loop, FloorRule};
use crate::panel::{Panel, PanelError};
use crate::policy::Allocator;

/// CPPI with `floor_value = floor` on the engine's unit-dollar basis. The
/// cushion shrinks as losses pull the account toward the floor and the
/// policy de-risks proportionally.
#[derive(Debug, Clone, Copy)]
pub struct ConstantFloor {
    /// Floor as a fraction of the starting account value.
    pub floor: f64,
    /// Cushion multiplier.
    pub multiplier: f64,
}

impl ConstantFloor {
    pub fn new(floor: f64, multiplier: f64) -> Self {
        Self { floor, multiplier }
    }
}

impl Allocator for ConstantFloor {
    fn name(&self) -> &str {
        "constant_floor"
    }

    fn allocate(&self, risky: &Panel, safe: &Panel) -> Result<Panel, PanelError> {
        run_floor_loop(
            risky,
            safe,
            self.multiplier,
            &FloorRule::ConstantFraction(self.floor),
        )
    }
}
