//! Return and weight panels — the T×N tables every component consumes.
//!
//! A panel is an immutable table of f64 with rows indexed by time step
//! (0..T-1, chronological) and columns indexed by scenario. Return panels,
//! weight panels, and discount-factor panels all share this one type; what
//! distinguishes them is how their cells are interpreted, not their shape.
//!
//! Conformance is positional: two panels conform iff they have the same
//! number of steps and scenarios. Row t of one panel and row t of another
//! always refer to the same period.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by panel construction and shape preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// Two panels that must share a shape do not.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// Backing data length disagrees with the declared shape.
    #[error("data length {len} does not fill a {n_steps}x{n_scenarios} panel")]
    DataLength {
        len: usize,
        n_steps: usize,
        n_scenarios: usize,
    },

    /// An allocator returned a weight panel whose shape does not match its
    /// inputs. This is a bug in the allocator, never a data problem, and is
    /// always fatal.
    #[error("allocator '{policy}' returned weights of shape {got:?} for inputs of shape {expected:?}")]
    PolicyContract {
        policy: String,
        expected: (usize, usize),
        got: (usize, usize),
    },
}

/// An immutable T×N table of f64, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    n_steps: usize,
    n_scenarios: usize,
    data: Vec<f64>,
}

impl Panel {
    /// Build a panel from row-major data. Fails when the data length does
    /// not equal `n_steps * n_scenarios`.
    pub fn new(n_steps: usize, n_scenarios: usize, data: Vec<f64>) -> Result<Self, PanelError> {
        if data.len() != n_steps * n_scenarios {
            return Err(PanelError::DataLength {
                len: data.len(),
                n_steps,
                n_scenarios,
            });
        }
        Ok(Self {
            n_steps,
            n_scenarios,
            data,
        })
    }

    /// A panel with every cell set to `value`.
    pub fn filled(n_steps: usize, n_scenarios: usize, value: f64) -> Self {
        Self {
            n_steps,
            n_scenarios,
            data: vec![value; n_steps * n_scenarios],
        }
    }

    /// A panel whose cell at (step, scenario) is `f(step, scenario)`.
    pub fn from_fn(
        n_steps: usize,
        n_scenarios: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        let mut data = Vec::with_capacity(n_steps * n_scenarios);
        for step in 0..n_steps {
            for scenario in 0..n_scenarios {
                data.push(f(step, scenario));
            }
        }
        Self {
            n_steps,
            n_scenarios,
            data,
        }
    }

    /// Build a panel from per-scenario columns. All columns must have the
    /// same length; an empty column list yields a 0×0 panel.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self, PanelError> {
        let n_scenarios = columns.len();
        let n_steps = columns.first().map_or(0, Vec::len);
        for col in columns {
            if col.len() != n_steps {
                return Err(PanelError::ShapeMismatch {
                    expected: (n_steps, n_scenarios),
                    got: (col.len(), n_scenarios),
                });
            }
        }
        Ok(Self::from_fn(n_steps, n_scenarios, |t, s| columns[s][t]))
    }

    /// Single-scenario panel from one return series.
    pub fn from_series(series: &[f64]) -> Self {
        Self {
            n_steps: series.len(),
            n_scenarios: 1,
            data: series.to_vec(),
        }
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn n_scenarios(&self) -> usize {
        self.n_scenarios
    }

    /// `(n_steps, n_scenarios)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_steps, self.n_scenarios)
    }

    /// Cell at (step, scenario). Panics on out-of-range indices, like slice
    /// indexing — shape preconditions are checked at the panel level, not
    /// per cell.
    #[inline]
    pub fn at(&self, step: usize, scenario: usize) -> f64 {
        debug_assert!(step < self.n_steps && scenario < self.n_scenarios);
        self.data[step * self.n_scenarios + scenario]
    }

    /// One time step across all scenarios.
    pub fn row(&self, step: usize) -> &[f64] {
        let start = step * self.n_scenarios;
        &self.data[start..start + self.n_scenarios]
    }

    /// One scenario across all time steps (copied — columns are strided).
    pub fn column(&self, scenario: usize) -> Vec<f64> {
        (0..self.n_steps).map(|t| self.at(t, scenario)).collect()
    }

    pub fn same_shape(&self, other: &Panel) -> bool {
        self.shape() == other.shape()
    }

    /// Precondition check used by the harness and the engine: both panels
    /// must describe the same steps and scenarios.
    pub fn ensure_same_shape(&self, other: &Panel) -> Result<(), PanelError> {
        if self.same_shape(other) {
            Ok(())
        } else {
            Err(PanelError::ShapeMismatch {
                expected: self.shape(),
                got: other.shape(),
            })
        }
    }

    /// Elementwise transform.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Panel {
        Panel {
            n_steps: self.n_steps,
            n_scenarios: self.n_scenarios,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise combination of two conformant panels.
    pub fn zip_with(&self, other: &Panel, f: impl Fn(f64, f64) -> f64) -> Result<Panel, PanelError> {
        self.ensure_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Panel {
            n_steps: self.n_steps,
            n_scenarios: self.n_scenarios,
            data,
        })
    }

    /// Per-scenario running product of `1 + r`, scaled by `start` — the
    /// wealth index of one unit (or `start` dollars) compounded through
    /// this panel's returns.
    pub fn wealth_index(&self, start: f64) -> Panel {
        let mut wealth = vec![0.0; self.data.len()];
        let mut level = vec![start; self.n_scenarios];
        for step in 0..self.n_steps {
            for scenario in 0..self.n_scenarios {
                level[scenario] *= 1.0 + self.at(step, scenario);
                wealth[step * self.n_scenarios + scenario] = level[scenario];
            }
        }
        Panel {
            n_steps: self.n_steps,
            n_scenarios: self.n_scenarios,
            data: wealth,
        }
    }
}
