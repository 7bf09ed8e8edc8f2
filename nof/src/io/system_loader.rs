//! Turns configuration input into integrals and an electron count

use crate::config::{Atom, Config, SystemConfig};
use crate::integrals::{IntegralSet, TwoElectronTensor};
use color_eyre::eyre::{eyre, Result, WrapErr};
use nalgebra::DMatrix;
use periodic_table_on_an_enum::Element;
use std::fs;
use std::path::Path;
use tracing::info;

/// Molecule ready for energy evaluation
#[derive(Debug, Clone)]
pub struct MolecularSystem {
    pub name: String,
    pub integrals: IntegralSet,
    pub n_electrons: usize,
    pub reference_energy: Option<f64>,
}

/// Read and parse a YAML configuration, with defaults applied
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;

    let config = serde_yml::from_str::<Config>(&content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();
    Ok(config)
}

/// Electrons of a neutral geometry minus `charge`
pub fn count_electrons(geometry: &[Atom], charge: i32) -> Result<usize> {
    let mut total: i64 = 0;
    for atom in geometry {
        let element = Element::from_symbol(&atom.element)
            .ok_or_else(|| eyre!("Invalid element symbol: {}", atom.element))?;
        total += element.get_atomic_number() as i64;
    }

    let electrons = total - charge as i64;
    if electrons < 0 {
        return Err(eyre!(
            "Charge {} exceeds the nuclear charge {} of the geometry",
            charge,
            total
        ));
    }
    Ok(electrons as usize)
}

pub fn load_system(system: &SystemConfig) -> Result<MolecularSystem> {
    let name = system.name.clone().unwrap_or_else(|| "molecule".to_string());
    info!("\nPreparing system {}...", name);

    let norb = system.one_electron.len();
    if norb == 0 {
        return Err(eyre!("The one-electron matrix is empty"));
    }
    if let Some(row) = system.one_electron.iter().find(|row| row.len() != norb) {
        return Err(eyre!(
            "The one-electron matrix must be square: found a row of length {} for {} rows",
            row.len(),
            norb
        ));
    }
    let flat: Vec<f64> = system.one_electron.iter().flatten().copied().collect();
    let core_hamiltonian = DMatrix::from_row_slice(norb, norb, &flat);

    let eri = TwoElectronTensor::from_chemist(norb, &system.two_electron)
        .wrap_err("Invalid two-electron integrals")?;
    let integrals = IntegralSet::new(system.nuclear_repulsion, core_hamiltonian, eri)?;

    let n_electrons = match (system.n_electrons, &system.geometry) {
        (Some(n), _) => n,
        (None, Some(geometry)) => count_electrons(geometry, system.charge.unwrap_or(0))?,
        (None, None) => {
            return Err(eyre!(
                "Either n_electrons or a geometry is needed to count electrons"
            ))
        }
    };

    info!("  {} spatial orbitals, {} electrons", norb, n_electrons);
    info!("  nuclear repulsion {:.10} au", system.nuclear_repulsion);

    Ok(MolecularSystem {
        name,
        integrals,
        n_electrons,
        reference_energy: system.reference_energy,
    })
}
