use super::FunctionalRun;
use tracing::info;

pub fn report_run(run: &FunctionalRun, reference: Option<f64>) {
    let breakdown = &run.breakdown;
    info!("\n{} minimization {}", run.functional, run.trace.status);
    info!("  Iterations: {}", run.trace.iterations);
    if let Some(params) = run.trace.final_parameters() {
        info!("  Parameters: {:.8?}", params.as_slice());
    }

    info!("\n  Natural orbital occupations (alpha):");
    for (i, n) in run.basis.occupations.iter().enumerate() {
        info!("    Orbital {}: {:.8}", i + 1, n);
    }

    info!("\n  Nuclear repulsion:     {:.10} au", breakdown.nuclear_repulsion);
    info!("  One-electron energy:   {:.10} au", breakdown.one_electron);
    info!("  Two-electron energy:   {:.10} au", breakdown.two_electron);
    info!("  {} Total Energy: {:.10} au", run.functional, breakdown.total());
    if let Some(exact) = reference {
        info!("  Error vs reference:    {:+.3e} au", breakdown.total() - exact);
    }
}

pub fn report_comparison(name: &str, runs: &[FunctionalRun], reference: Option<f64>) {
    info!("\nSummary for {}:", name);
    info!("  {:<8} {:>18} {:>6} {:>12}", "Func", "Energy (au)", "Iter", "Error");
    for run in runs {
        let energy = run.breakdown.total();
        let error = reference
            .map(|exact| format!("{:+.3e}", energy - exact))
            .unwrap_or_else(|| "-".to_string());
        info!(
            "  {:<8} {:>18.10} {:>6} {:>12}",
            run.functional.name(),
            energy,
            run.trace.iterations,
            error
        );
    }
    if let Some(exact) = reference {
        info!("  {:<8} {:>18.10}", "exact", exact);
    }
}
