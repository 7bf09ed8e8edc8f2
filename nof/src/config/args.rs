//! Command-line argument parsing for NOF-VQE runs

use clap::Parser;

/// Variational natural-orbital-functional energy minimization with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override functional (hf, gu, bbac3, bbc2, pnof3, pnof4 or all)
    #[arg(short, long)]
    pub functional: Option<String>,

    /// Override gradient descent learning rate
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Override maximum optimizer iterations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Override convergence threshold on the largest gradient component
    #[arg(long)]
    pub convergence_threshold: Option<f64>,

    /// Override finite-difference step
    #[arg(long)]
    pub gradient_step: Option<f64>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the optimization trajectory to this file
    #[arg(short, long)]
    pub trajectory: Option<String>,

    /// Treat negative occupation products beyond the noise tolerance as errors
    #[arg(long)]
    pub strict_domain: bool,
}
