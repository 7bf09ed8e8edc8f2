//! NOF-VQE Command-Line Interface
//!
//! Entry point for minimizing natural-orbital-functional energies of a
//! parameterized trial state, driven by a YAML configuration.

use color_eyre::eyre::Result;

mod app;

use app::NofApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    NofApplication::from_cli()?.run()
}
