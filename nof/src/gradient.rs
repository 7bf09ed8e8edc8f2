//! Gradient oracles for the VQE loop
//!
//! The optimizer only needs `∂E/∂θ` of an energy closure. Finite differences
//! are the default; anything implementing [`GradientOracle`] can replace them.

use crate::error::Result;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Produces the gradient of a scalar function at a parameter point
pub trait GradientOracle {
    fn gradient(
        &self,
        f: &mut dyn FnMut(&[f64]) -> Result<f64>,
        params: &[f64],
    ) -> Result<DVector<f64>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceScheme {
    #[default]
    Central,
    Forward,
}

/// Numerical gradient by per-parameter displacement
#[derive(Debug, Clone, Copy)]
pub struct FiniteDifference {
    pub step: f64,
    pub scheme: DifferenceScheme,
}

impl Default for FiniteDifference {
    fn default() -> Self {
        Self {
            step: 1e-6,
            scheme: DifferenceScheme::Central,
        }
    }
}

impl FiniteDifference {
    pub fn new(step: f64, scheme: DifferenceScheme) -> Self {
        Self { step, scheme }
    }
}

impl GradientOracle for FiniteDifference {
    fn gradient(
        &self,
        f: &mut dyn FnMut(&[f64]) -> Result<f64>,
        params: &[f64],
    ) -> Result<DVector<f64>> {
        let mut shifted = params.to_vec();
        let mut gradient = DVector::zeros(params.len());

        let base = match self.scheme {
            DifferenceScheme::Forward => Some(f(params)?),
            DifferenceScheme::Central => None,
        };

        for i in 0..params.len() {
            shifted[i] = params[i] + self.step;
            let plus = f(&shifted)?;

            gradient[i] = match base {
                Some(e0) => (plus - e0) / self.step,
                None => {
                    shifted[i] = params[i] - self.step;
                    let minus = f(&shifted)?;
                    (plus - minus) / (2.0 * self.step)
                }
            };
            shifted[i] = params[i];
        }

        Ok(gradient)
    }
}
