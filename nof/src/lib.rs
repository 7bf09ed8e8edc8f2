// Main library file for NOF-VQE energy evaluation

pub mod config;
pub mod energy;
pub mod error;
pub mod functional_impl;
pub mod gradient;
pub mod integrals;
pub mod io;
pub mod natural_orbitals;
pub mod optim_impl;
pub mod rdm_impl;
pub mod transform;

pub use energy::{EnergyBreakdown, NofContext};
pub use error::{NofError, Result};
pub use functional_impl::Functional;
