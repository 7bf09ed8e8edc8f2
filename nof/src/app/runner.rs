use color_eyre::eyre::{Result, WrapErr};
use nof::gradient::GradientOracle;
use nof::natural_orbitals::{self, OrbitalBasis};
use nof::optim_impl::{GradientDescentOptimizer, OptimizationTrace, ParameterOptimizer};
use nof::rdm_impl::RdmSource;
use nof::{EnergyBreakdown, Functional, NofContext};
use tracing::info;

/// Outcome of one functional's minimization
pub struct FunctionalRun {
    pub functional: Functional,
    pub trace: OptimizationTrace,
    pub breakdown: EnergyBreakdown,
    pub basis: OrbitalBasis,
}

/// Minimize one functional from `initial`, independently of any other run
pub fn run_functional<S: RdmSource>(
    context: &NofContext,
    source: &S,
    optimizer: &GradientDescentOptimizer,
    oracle: &dyn GradientOracle,
    initial: &[f64],
) -> Result<FunctionalRun> {
    let functional = context.functional();
    info!("\n#####################################################");
    info!("---------- {} ----------", functional);
    info!("#####################################################");

    let mut energy = |params: &[f64]| context.energy(source, params);
    let trace = optimizer
        .minimize(&mut energy, oracle, initial)
        .wrap_err_with(|| format!("{} minimization failed", functional))?;

    let last = trace
        .final_parameters()
        .map(|p| p.as_slice().to_vec())
        .unwrap_or_else(|| initial.to_vec());
    let rdm = source.measure(&last)?;
    let basis = natural_orbitals::decompose(&rdm)?;
    let breakdown = context.evaluate_basis(&basis)?;

    Ok(FunctionalRun {
        functional,
        trace,
        breakdown,
        basis,
    })
}
