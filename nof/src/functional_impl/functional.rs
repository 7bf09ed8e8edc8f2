//! Functional selector and the per-variant energy combinations

use super::coefficients::{self, CoefficientMatrices, DomainPolicy};
use crate::error::{NofError, Result};
use crate::transform::NaturalOrbitalIntegrals;
use nalgebra::DVector;
use std::fmt;
use std::str::FromStr;

/// The closed set of supported functionals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Functional {
    HF,
    GU,
    BBAC3,
    BBC2,
    PNOF3,
    PNOF4,
}

impl Functional {
    pub const ALL: [Functional; 6] = [
        Functional::HF,
        Functional::GU,
        Functional::BBAC3,
        Functional::BBC2,
        Functional::PNOF3,
        Functional::PNOF4,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Functional::HF => "HF",
            Functional::GU => "GU",
            Functional::BBAC3 => "BBAC3",
            Functional::BBC2 => "BBC2",
            Functional::PNOF3 => "PNOF3",
            Functional::PNOF4 => "PNOF4",
        }
    }

    /// Coefficient matrices for occupations `n` and Fermi level `fermi`
    pub fn coefficients(
        &self,
        n: &DVector<f64>,
        fermi: usize,
        policy: &DomainPolicy,
    ) -> Result<CoefficientMatrices> {
        coefficients::check_domain(self, n, policy)?;

        let matrices = match self {
            Functional::HF => coefficients::hf(n),
            Functional::GU => coefficients::gu(n),
            Functional::BBAC3 => coefficients::bbac3(n, fermi),
            Functional::BBC2 => coefficients::bbc2(n, fermi),
            Functional::PNOF3 => coefficients::pnof3(n, fermi),
            Functional::PNOF4 => coefficients::pnof4(n, fermi),
        };
        Ok(matrices)
    }

    /// Two-electron energy from the coefficient matrices and rotated integrals.
    ///
    /// Exchange weights are read transposed, `B[q,p]` for the `(p,q)` term.
    pub fn two_electron_energy(
        &self,
        n: &DVector<f64>,
        coeffs: &CoefficientMatrices,
        integrals: &NaturalOrbitalIntegrals,
    ) -> f64 {
        let norb = n.len();
        let CoefficientMatrices { a, b, delta, .. } = coeffs;
        let NaturalOrbitalIntegrals { j, k, .. } = integrals;

        let mut energy = 0.0;
        for p in 0..norb {
            for q in 0..norb {
                energy += match self {
                    Functional::HF => {
                        if p == q {
                            continue;
                        }
                        n[q] * n[p] * (2.0 * j[(p, q)] - k[(p, q)])
                    }
                    Functional::GU | Functional::BBC2 => {
                        2.0 * n[q] * n[p] * j[(p, q)] - b[(q, p)] * k[(p, q)]
                    }
                    Functional::BBAC3 => {
                        2.0 * n[q] * n[p] * j[(p, q)]
                            + 0.5 * (-2.0 * n[p] * n[q] + b[(q, p)]) * k[(p, q)]
                    }
                    Functional::PNOF3 | Functional::PNOF4 => {
                        if p == q {
                            n[p] * j[(p, p)]
                        } else {
                            (0.5 * a[(q, p)] - delta[(q, p)]) * (2.0 * j[(p, q)] - k[(p, q)])
                                + b[(q, p)] * k[(p, q)]
                        }
                    }
                };
            }
        }
        energy
    }
}

impl FromStr for Functional {
    type Err = NofError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hf" => Ok(Functional::HF),
            "gu" => Ok(Functional::GU),
            "bbac3" => Ok(Functional::BBAC3),
            "bbc2" => Ok(Functional::BBC2),
            "pnof3" => Ok(Functional::PNOF3),
            "pnof4" => Ok(Functional::PNOF4),
            _ => Err(NofError::InvalidFunctionalId(s.to_string())),
        }
    }
}

impl fmt::Display for Functional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
