//! Configuration management for NOF-VQE runs
//!
//! A run is described by a YAML file holding the molecular integrals, the
//! ansatz circuit and the optimizer settings. Optional sections are filled
//! from defaults by [`Config::with_defaults`]; command-line flags override
//! individual values afterwards.

mod args;

pub use args::Args;

use crate::error::{NofError, Result};
use crate::functional_impl::{DomainPolicy, Functional};
use crate::gradient::{DifferenceScheme, FiniteDifference};
use crate::optim_impl::GradientDescentOptimizer;
use crate::rdm_impl::ExcitationGate;
use serde::{Deserialize, Serialize};

/// Functional used when the configuration names none
pub const DEFAULT_FUNCTIONAL: &str = "bbac3";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub system: SystemConfig,
    /// functional name, or `all` to run every functional in turn
    pub functional: Option<String>,
    pub ansatz: AnsatzConfig,
    pub optimization: Option<OptimizationParams>,
    pub domain: Option<DomainParams>,
}

/// Atomic position configuration (Å)
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Atom {
    pub element: String,
    pub coords: [f64; 3],
}

/// Molecule and its precomputed integrals in an orthonormal orbital basis
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    pub name: Option<String>,
    pub geometry: Option<Vec<Atom>>,
    pub charge: Option<i32>,
    /// takes precedence over the count derived from `geometry`
    pub n_electrons: Option<usize>,
    pub nuclear_repulsion: f64,
    /// one-electron matrix, one row per entry
    pub one_electron: Vec<Vec<f64>>,
    /// unique chemist-notation integrals `[i, j, k, l, (ij|kl)]`
    pub two_electron: Vec<(usize, usize, usize, usize, f64)>,
    /// exact energy to compare against, if known
    pub reference_energy: Option<f64>,
}

/// Circuit preparing the trial state
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnsatzConfig {
    pub gates: Vec<ExcitationGate>,
    pub initial_parameters: Option<Vec<f64>>,
}

impl AnsatzConfig {
    /// Starting point of the optimization; 0.1 for every parameter if unset
    pub fn initial_parameters(&self, n_parameters: usize) -> Result<Vec<f64>> {
        match &self.initial_parameters {
            Some(params) if params.len() != n_parameters => Err(NofError::ParameterMismatch {
                expected: n_parameters,
                found: params.len(),
            }),
            Some(params) => Ok(params.clone()),
            None => Ok(vec![0.1; n_parameters]),
        }
    }
}

/// VQE loop parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OptimizationParams {
    pub learning_rate: Option<f64>,
    pub max_iterations: Option<usize>,
    pub convergence_threshold: Option<f64>,
    pub gradient_step: Option<f64>,
    pub gradient_scheme: Option<DifferenceScheme>,
}

impl Default for OptimizationParams {
    fn default() -> Self {
        OptimizationParams {
            learning_rate: Some(0.1),
            max_iterations: Some(1000),
            convergence_threshold: Some(1e-3),
            gradient_step: Some(1e-6),
            gradient_scheme: Some(DifferenceScheme::Central),
        }
    }
}

impl OptimizationParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.learning_rate.is_none() {
            self.learning_rate = defaults.learning_rate;
        }
        if self.max_iterations.is_none() {
            self.max_iterations = defaults.max_iterations;
        }
        if self.convergence_threshold.is_none() {
            self.convergence_threshold = defaults.convergence_threshold;
        }
        if self.gradient_step.is_none() {
            self.gradient_step = defaults.gradient_step;
        }
        if self.gradient_scheme.is_none() {
            self.gradient_scheme = defaults.gradient_scheme;
        }
        self
    }
}

/// Handling of occupation products pushed negative by noise
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DomainParams {
    pub noise_tolerance: Option<f64>,
    pub strict: Option<bool>,
}

impl Default for DomainParams {
    fn default() -> Self {
        let policy = DomainPolicy::default();
        DomainParams {
            noise_tolerance: Some(policy.noise_tolerance),
            strict: Some(policy.strict),
        }
    }
}

impl DomainParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.noise_tolerance.is_none() {
            self.noise_tolerance = defaults.noise_tolerance;
        }
        if self.strict.is_none() {
            self.strict = defaults.strict;
        }
        self
    }
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        if self.functional.is_none() {
            self.functional = Some(DEFAULT_FUNCTIONAL.to_string());
        }
        self.optimization = Some(self.optimization.take().unwrap_or_default().with_defaults());
        self.domain = Some(self.domain.take().unwrap_or_default().with_defaults());
        self
    }

    /// Apply command-line overrides on top of the file values
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(functional) = &args.functional {
            self.functional = Some(functional.clone());
        }

        let mut optimization = self.optimization.take().unwrap_or_default();
        if args.learning_rate.is_some() {
            optimization.learning_rate = args.learning_rate;
        }
        if args.max_iterations.is_some() {
            optimization.max_iterations = args.max_iterations;
        }
        if args.convergence_threshold.is_some() {
            optimization.convergence_threshold = args.convergence_threshold;
        }
        if args.gradient_step.is_some() {
            optimization.gradient_step = args.gradient_step;
        }
        self.optimization = Some(optimization.with_defaults());

        if args.strict_domain {
            let mut domain = self.domain.take().unwrap_or_default();
            domain.strict = Some(true);
            self.domain = Some(domain.with_defaults());
        }
        self
    }

    /// Functionals selected by the `functional` entry
    pub fn functionals(&self) -> Result<Vec<Functional>> {
        let name = self.functional.as_deref().unwrap_or(DEFAULT_FUNCTIONAL).trim();
        if name.eq_ignore_ascii_case("all") {
            Ok(Functional::ALL.to_vec())
        } else {
            Ok(vec![name.parse()?])
        }
    }

    pub fn optimizer(&self) -> GradientDescentOptimizer {
        let defaults = GradientDescentOptimizer::default();
        let params = self.optimization.clone().unwrap_or_default().with_defaults();
        GradientDescentOptimizer {
            learning_rate: params.learning_rate.unwrap_or(defaults.learning_rate),
            max_iterations: params.max_iterations.unwrap_or(defaults.max_iterations),
            tolerance: params.convergence_threshold.unwrap_or(defaults.tolerance),
        }
    }

    pub fn gradient_oracle(&self) -> FiniteDifference {
        let defaults = FiniteDifference::default();
        let params = self.optimization.clone().unwrap_or_default().with_defaults();
        FiniteDifference {
            step: params.gradient_step.unwrap_or(defaults.step),
            scheme: params.gradient_scheme.unwrap_or(defaults.scheme),
        }
    }

    pub fn domain_policy(&self) -> DomainPolicy {
        let defaults = DomainPolicy::default();
        let params = self.domain.clone().unwrap_or_default().with_defaults();
        DomainPolicy {
            noise_tolerance: params.noise_tolerance.unwrap_or(defaults.noise_tolerance),
            strict: params.strict.unwrap_or(defaults.strict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const MINIMAL: &str = r#"
system:
  nuclear_repulsion: 0.5
  one_electron:
    - [-1.0, 0.0]
    - [0.0, -0.5]
  two_electron:
    - [0, 0, 0, 0, 0.6]
  n_electrons: 2
ansatz:
  gates:
    - kind: double
      wires: [0, 1, 2, 3]
      param: 0
"#;

    fn minimal() -> Config {
        serde_yml::from_str::<Config>(MINIMAL).unwrap().with_defaults()
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config = minimal();
        assert_eq!(config.functionals().unwrap(), vec![Functional::BBAC3]);

        let optimizer = config.optimizer();
        assert_eq!(optimizer.learning_rate, 0.1);
        assert_eq!(optimizer.max_iterations, 1000);
        assert_eq!(optimizer.tolerance, 1e-3);

        let oracle = config.gradient_oracle();
        assert_eq!(oracle.step, 1e-6);
        assert_eq!(oracle.scheme, DifferenceScheme::Central);

        assert_eq!(config.domain_policy(), DomainPolicy::default());
        assert_eq!(config.ansatz.initial_parameters(1).unwrap(), vec![0.1]);
        assert_eq!(config.system.two_electron[0], (0, 0, 0, 0, 0.6));
    }

    #[test]
    fn test_default_functional_with_and_without_defaults_pass() {
        let raw = serde_yml::from_str::<Config>(MINIMAL).unwrap();
        assert!(raw.functional.is_none());
        assert_eq!(raw.functionals().unwrap(), vec![Functional::BBAC3]);

        let filled = raw.with_defaults();
        assert_eq!(filled.functional.as_deref(), Some(DEFAULT_FUNCTIONAL));
        assert_eq!(filled.functionals().unwrap(), vec![Functional::BBAC3]);
    }

    #[test]
    fn test_partial_sections_keep_given_values() {
        let extra = "\
optimization:
  learning_rate: 0.05
  gradient_scheme: forward
domain:
  strict: true
";
        let yaml = format!("{MINIMAL}{extra}");
        let config = serde_yml::from_str::<Config>(&yaml).unwrap().with_defaults();

        let optimizer = config.optimizer();
        assert_eq!(optimizer.learning_rate, 0.05);
        assert_eq!(optimizer.max_iterations, 1000);
        assert_eq!(config.gradient_oracle().scheme, DifferenceScheme::Forward);
        assert!(config.domain_policy().strict);
        assert_eq!(config.domain_policy().noise_tolerance, 1e-8);
    }

    #[test]
    fn test_command_line_overrides() {
        let args = Args::parse_from([
            "nof",
            "--functional",
            "all",
            "--max-iterations",
            "7",
            "--gradient-step",
            "1e-5",
            "--strict-domain",
        ]);
        let config = minimal().apply_args(&args);

        assert_eq!(config.functionals().unwrap(), Functional::ALL.to_vec());
        assert_eq!(config.optimizer().max_iterations, 7);
        assert_eq!(config.optimizer().learning_rate, 0.1);
        assert_eq!(config.gradient_oracle().step, 1e-5);
        assert!(config.domain_policy().strict);
    }

    #[test]
    fn test_unknown_functional_is_rejected() {
        let mut config = minimal();
        config.functional = Some("b3lyp".to_string());
        assert_eq!(
            config.functionals(),
            Err(NofError::InvalidFunctionalId("b3lyp".to_string()))
        );
    }

    #[test]
    fn test_initial_parameter_count() {
        let mut config = minimal();
        config.ansatz.initial_parameters = Some(vec![0.2, 0.3]);
        assert_eq!(
            config.ansatz.initial_parameters(1),
            Err(NofError::ParameterMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
