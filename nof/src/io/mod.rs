//! Input/Output operations for NOF-VQE runs
//!
//! This module handles logging setup, trajectory files and turning the
//! YAML system description into integrals.

mod output;
mod system_loader;

pub use output::{setup_output, write_trajectory};
pub use system_loader::{count_electrons, load_config, load_system, MolecularSystem};
