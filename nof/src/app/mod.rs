mod report;
mod runner;

pub use runner::{run_functional, FunctionalRun};

use self::report::{report_comparison, report_run};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use nof::config::{Args, Config};
use nof::io::{load_config, load_system, setup_output, write_trajectory};
use nof::rdm_impl::{RdmSource, StatevectorRdm};
use nof::NofContext;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

pub struct NofApplication {
    args: Args,
    config: Config,
}

impl NofApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args.config_file)?.apply_args(&args);
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded from: {}", self.args.config_file);
        info!("{:?}", self.config);

        let system = load_system(&self.config.system)?;
        let functionals = self.config.functionals()?;

        let source = StatevectorRdm::new(
            system.integrals.norb(),
            system.n_electrons,
            self.config.ansatz.gates.clone(),
        )
        .wrap_err("Invalid ansatz")?;
        let initial = self.config.ansatz.initial_parameters(source.n_parameters())?;
        info!(
            "Ansatz: {} excitation gates, {} parameters, initial {:?}",
            source.gates().len(),
            source.n_parameters(),
            initial
        );

        let context = NofContext::new(system.integrals.clone(), system.n_electrons, functionals[0])?
            .with_domain_policy(self.config.domain_policy());
        let optimizer = self.config.optimizer();
        let oracle = self.config.gradient_oracle();

        let mut runs = Vec::with_capacity(functionals.len());
        for functional in functionals {
            let run = run_functional(
                &context.with_functional(functional),
                &source,
                &optimizer,
                &oracle,
                &initial,
            )?;
            report_run(&run, system.reference_energy);
            runs.push(run);
        }

        if runs.len() > 1 {
            report_comparison(&system.name, &runs, system.reference_energy);
        }

        if let Some(path) = &self.args.trajectory {
            let file = File::create(path)
                .wrap_err_with(|| format!("Unable to create trajectory file: {}", path))?;
            let mut writer = BufWriter::new(file);
            for run in &runs {
                write_trajectory(&mut writer, run.functional, &run.trace)?;
            }
            writer.flush()?;
            info!("Trajectory written to: {}", path);
        }

        Ok(())
    }
}
