//! Fixed-step gradient descent

use super::{OptimizationTrace, OptimizerStatus, ParameterOptimizer};
use crate::error::Result;
use crate::gradient::GradientOracle;
use nalgebra::DVector;
use tracing::{debug, info};

/// Plain gradient descent `θ ← θ - η ∇E(θ)`
#[derive(Debug, Clone, Copy)]
pub struct GradientDescentOptimizer {
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// convergence when `max |∂E/∂θ_i|` drops to or below this value
    pub tolerance: f64,
}

impl Default for GradientDescentOptimizer {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iterations: 1000,
            tolerance: 1e-3,
        }
    }
}

impl GradientDescentOptimizer {
    pub fn new(learning_rate: f64, max_iterations: usize, tolerance: f64) -> Self {
        Self {
            learning_rate,
            max_iterations,
            tolerance,
        }
    }

    fn log_progress(
        &self,
        iteration: usize,
        energy: f64,
        params: &DVector<f64>,
        max_gradient: f64,
    ) {
        info!(
            "  iter {:4}  E = {:.10} au  max|g| = {:.3e}  θ = {:.6?}",
            iteration,
            energy,
            max_gradient,
            params.as_slice()
        );
    }
}

impl ParameterOptimizer for GradientDescentOptimizer {
    fn minimize(
        &self,
        energy: &mut dyn FnMut(&[f64]) -> Result<f64>,
        oracle: &dyn GradientOracle,
        initial: &[f64],
    ) -> Result<OptimizationTrace> {
        let mut params = DVector::from_column_slice(initial);
        let initial_energy = energy(params.as_slice())?;

        let mut trace = OptimizationTrace {
            energy_history: vec![initial_energy],
            parameter_history: vec![params.clone()],
            status: OptimizerStatus::Initialized,
            iterations: 0,
            final_gradient: None,
        };

        info!("---------- Starting gradient descent ----------");
        info!(
            "  learning rate {}, tolerance {:.1e}, max iterations {}",
            self.learning_rate, self.tolerance, self.max_iterations
        );
        info!("  iter    0  E = {:.10} au", initial_energy);

        if self.max_iterations == 0 {
            trace.status = OptimizerStatus::MaxIterReached;
        }

        while !trace.status.is_terminal() {
            trace.status = OptimizerStatus::Iterating;

            let gradient = oracle.gradient(energy, params.as_slice())?;
            params -= self.learning_rate * &gradient;
            let current = energy(params.as_slice())?;

            trace.iterations += 1;
            trace.energy_history.push(current);
            trace.parameter_history.push(params.clone());

            let max_gradient = gradient.amax();
            debug!("gradient {:.8?}", gradient.as_slice());
            self.log_progress(trace.iterations, current, &params, max_gradient);
            trace.final_gradient = Some(gradient);

            if max_gradient <= self.tolerance {
                trace.status = OptimizerStatus::Converged;
            } else if trace.iterations >= self.max_iterations {
                trace.status = OptimizerStatus::MaxIterReached;
            }
        }

        match trace.status {
            OptimizerStatus::Converged => {
                info!("Gradient descent converged after {} iterations", trace.iterations)
            }
            _ => info!(
                "Gradient descent reached the maximum number of iterations ({}) without converging",
                self.max_iterations
            ),
        }
        info!("-----------------------------------------------\n");

        Ok(trace)
    }
}
