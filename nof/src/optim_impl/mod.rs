//! Variational parameter optimization
//!
//! The VQE loop treats the whole energy pipeline as a black-box function of
//! the ansatz parameters and walks downhill using an injected gradient oracle.

mod gradient_descent;

pub use gradient_descent::GradientDescentOptimizer;

use crate::error::Result;
use crate::gradient::GradientOracle;
use nalgebra::DVector;
use std::fmt;

/// Lifecycle of a single minimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerStatus {
    Initialized,
    Iterating,
    Converged,
    MaxIterReached,
}

impl OptimizerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converged | Self::MaxIterReached)
    }
}

impl fmt::Display for OptimizerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Initialized => "initialized",
            Self::Iterating => "iterating",
            Self::Converged => "converged",
            Self::MaxIterReached => "maximum iterations reached",
        };
        f.write_str(label)
    }
}

/// Everything recorded during a minimization
#[derive(Debug, Clone)]
pub struct OptimizationTrace {
    /// energy at every visited point, starting with the initial parameters
    pub energy_history: Vec<f64>,
    pub parameter_history: Vec<DVector<f64>>,
    pub status: OptimizerStatus,
    pub iterations: usize,
    /// gradient used for the last update, if any step was taken
    pub final_gradient: Option<DVector<f64>>,
}

impl OptimizationTrace {
    pub fn final_energy(&self) -> f64 {
        self.energy_history.last().copied().unwrap_or(f64::NAN)
    }

    pub fn final_parameters(&self) -> Option<&DVector<f64>> {
        self.parameter_history.last()
    }

    pub fn is_converged(&self) -> bool {
        self.status == OptimizerStatus::Converged
    }
}

/// Minimizer over ansatz parameters
pub trait ParameterOptimizer {
    /// Run to a terminal state starting from `initial`
    fn minimize(
        &self,
        energy: &mut dyn FnMut(&[f64]) -> Result<f64>,
        oracle: &dyn GradientOracle,
        initial: &[f64],
    ) -> Result<OptimizationTrace>;
}
