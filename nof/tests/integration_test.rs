//! End-to-end runs on the example YAML inputs

use nof::config::Config;
use nof::gradient::GradientOracle;
use nof::io::{load_config, load_system, write_trajectory, MolecularSystem};
use nof::optim_impl::{OptimizerStatus, ParameterOptimizer};
use nof::rdm_impl::{RdmSource, StatevectorRdm};
use nof::{Functional, NofContext};
use std::path::PathBuf;

fn example_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("example")
        .join(filename)
}

fn h2() -> (Config, MolecularSystem, StatevectorRdm) {
    let config = load_config(example_path("h2_sto3g.yaml")).unwrap();
    let system = load_system(&config.system).unwrap();
    let source = StatevectorRdm::new(
        system.integrals.norb(),
        system.n_electrons,
        config.ansatz.gates.clone(),
    )
    .unwrap();
    (config, system, source)
}

#[test]
fn test_h2_example_loads() {
    let (config, system, source) = h2();
    assert_eq!(system.n_electrons, 2);
    assert_eq!(system.integrals.norb(), 2);
    assert_eq!(source.n_parameters(), 1);
    assert_eq!(config.functionals().unwrap(), vec![Functional::BBAC3]);
    assert_eq!(config.ansatz.initial_parameters(1).unwrap(), vec![0.1]);
}

#[test]
fn test_h2_scenario_energies() {
    let (config, system, source) = h2();
    let context = NofContext::new(system.integrals, system.n_electrons, Functional::BBAC3).unwrap();
    let oracle = config.gradient_oracle();
    let theta = [0.22501];

    for (functional, energy, gradient) in [
        (Functional::HF, -1.74308305, 0.42242185),
        (Functional::GU, -1.12131504, 0.13850048),
        (Functional::BBAC3, -1.12687652, 0.08957882),
    ] {
        let context = context.with_functional(functional);
        let mut f = |params: &[f64]| context.energy(&source, params);
        let e = f(&theta).unwrap();
        let g = oracle.gradient(&mut f, &theta).unwrap();
        assert!((e - energy).abs() < 1e-7, "{functional}: E = {e}");
        assert!((g[0] - gradient).abs() < 1e-6, "{functional}: dE/dθ = {}", g[0]);
    }
}

#[test]
fn test_h2_bbac3_vqe() {
    let (config, system, source) = h2();
    let context = NofContext::new(system.integrals, system.n_electrons, Functional::BBAC3)
        .unwrap()
        .with_domain_policy(config.domain_policy());
    let initial = config.ansatz.initial_parameters(source.n_parameters()).unwrap();

    let mut energy = |params: &[f64]| context.energy(&source, params);
    let trace = config
        .optimizer()
        .minimize(&mut energy, &config.gradient_oracle(), &initial)
        .unwrap();

    assert_eq!(trace.status, OptimizerStatus::Converged);
    assert!(trace.iterations <= 33);
    assert!(trace
        .energy_history
        .windows(2)
        .all(|pair| pair[1] <= pair[0] + 1e-12));

    // BBAC3 stays above the exact ground state for this system
    let exact = system.reference_energy.unwrap();
    assert!(trace.final_energy() > exact);
    assert!(trace.final_energy() - exact < 0.01);

    let mut buffer = Vec::new();
    write_trajectory(&mut buffer, Functional::BBAC3, &trace).unwrap();
    let lines = String::from_utf8(buffer).unwrap().lines().count();
    assert_eq!(lines, trace.iterations + 3);
}

#[test]
fn test_all_functionals_run_independently() {
    let (config, system, source) = h2();
    let context = NofContext::new(system.integrals, system.n_electrons, Functional::HF).unwrap();
    let initial = config.ansatz.initial_parameters(1).unwrap();
    let mut optimizer = config.optimizer();
    optimizer.max_iterations = 20;

    for functional in Functional::ALL {
        let context = context.with_functional(functional);
        let mut energy = |params: &[f64]| context.energy(&source, params);
        let trace = optimizer
            .minimize(&mut energy, &config.gradient_oracle(), &initial)
            .unwrap();

        assert_eq!(trace.energy_history.len(), trace.iterations + 1);
        assert!(trace.final_energy().is_finite(), "{functional}");
        assert!(
            trace.final_energy() <= trace.energy_history[0] + 1e-12,
            "{functional} ended above its starting energy"
        );
    }
}
