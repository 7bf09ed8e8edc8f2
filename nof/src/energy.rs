//! NOF energy assembly
//!
//! `NofContext` bundles everything that is fixed for one molecule and one
//! functional: the integrals, the Fermi level and the numerical domain
//! policy. It is built once and then queried for energies:
//!
//! E = E_nuc + Σ_p 2 n_p h_pp + E2(n, J, K)
//!
//! with the two-electron part supplied by the selected functional.

use crate::error::{NofError, Result};
use crate::functional_impl::{DomainPolicy, Functional};
use crate::integrals::IntegralSet;
use crate::natural_orbitals::{self, OrbitalBasis};
use crate::rdm_impl::RdmSource;
use crate::transform::{self, NaturalOrbitalIntegrals};
use tracing::debug;

/// Energy components of a single evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBreakdown {
    pub nuclear_repulsion: f64,
    pub one_electron: f64,
    pub two_electron: f64,
}

impl EnergyBreakdown {
    pub fn total(&self) -> f64 {
        self.nuclear_repulsion + self.one_electron + self.two_electron
    }
}

/// Immutable per-run evaluation context
#[derive(Debug, Clone)]
pub struct NofContext {
    integrals: IntegralSet,
    functional: Functional,
    fermi_level: usize,
    policy: DomainPolicy,
}

impl NofContext {
    /// Closed-shell context for `n_electrons` electrons
    pub fn new(integrals: IntegralSet, n_electrons: usize, functional: Functional) -> Result<Self> {
        let norb = integrals.norb();
        if n_electrons % 2 != 0 || n_electrons / 2 > norb {
            return Err(NofError::InvalidElectronCount { n_electrons, norb });
        }

        Ok(Self {
            integrals,
            functional,
            fermi_level: n_electrons / 2,
            policy: DomainPolicy::default(),
        })
    }

    pub fn with_domain_policy(mut self, policy: DomainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Same molecule, different functional
    pub fn with_functional(&self, functional: Functional) -> Self {
        Self {
            functional,
            ..self.clone()
        }
    }

    pub fn functional(&self) -> Functional {
        self.functional
    }

    pub fn fermi_level(&self) -> usize {
        self.fermi_level
    }

    pub fn norb(&self) -> usize {
        self.integrals.norb()
    }

    pub fn integrals(&self) -> &IntegralSet {
        &self.integrals
    }

    /// Energy of a natural-orbital basis
    pub fn evaluate_basis(&self, basis: &OrbitalBasis) -> Result<EnergyBreakdown> {
        if basis.norb() != self.norb() {
            return Err(NofError::DimensionMismatch {
                what: "natural orbital count",
                expected: self.norb(),
                found: basis.norb(),
            });
        }

        let rotated = transform::transform_integrals(&self.integrals, &basis.vecs)?;
        let breakdown = self.assemble(basis, &rotated)?;

        debug!(
            "{} energy {:.10} au, occupations {:.6?}",
            self.functional,
            breakdown.total(),
            basis.occupations.as_slice()
        );
        Ok(breakdown)
    }

    /// Energy of a triangular 1-RDM
    pub fn evaluate_rdm(&self, rdm: &[f64]) -> Result<EnergyBreakdown> {
        let basis = natural_orbitals::decompose(rdm)?;
        self.evaluate_basis(&basis)
    }

    /// Total energy of the state prepared by `source` at `params`
    pub fn energy<S: RdmSource + ?Sized>(&self, source: &S, params: &[f64]) -> Result<f64> {
        let rdm = source.measure(params)?;
        Ok(self.evaluate_rdm(&rdm)?.total())
    }

    fn assemble(
        &self,
        basis: &OrbitalBasis,
        rotated: &NaturalOrbitalIntegrals,
    ) -> Result<EnergyBreakdown> {
        let n = &basis.occupations;
        let coeffs = self.functional.coefficients(n, self.fermi_level, &self.policy)?;

        let one_electron = n
            .iter()
            .enumerate()
            .map(|(p, occupation)| 2.0 * occupation * rotated.h[(p, p)])
            .sum::<f64>();
        let two_electron = self.functional.two_electron_energy(n, &coeffs, rotated);

        let breakdown = EnergyBreakdown {
            nuclear_repulsion: self.integrals.nuclear_repulsion,
            one_electron,
            two_electron,
        };

        if !breakdown.total().is_finite() {
            return Err(NofError::NonFiniteEnergy);
        }
        Ok(breakdown)
    }
}
