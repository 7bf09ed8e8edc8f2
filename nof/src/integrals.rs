//! Molecular integrals consumed by the NOF pipeline
//!
//! Integrals are produced once per molecule by an external provider and are
//! read-only afterwards. The two-electron tensor is stored densely with the
//! index layout used by the energy expressions:
//!
//! I[p,q,r,s] = (ps|qr)
//!
//! so that the Coulomb integral is `I[p,q,q,p] = (pp|qq)` and the exchange
//! integral is `I[p,p,q,q] = (pq|pq)`.

use crate::error::{NofError, Result};
use nalgebra::DMatrix;
use std::ops::Index;

/// Dense norb^4 two-electron tensor
#[derive(Debug, Clone, PartialEq)]
pub struct TwoElectronTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl TwoElectronTensor {
    pub fn zeros(size: usize) -> Self {
        Self {
            data: vec![0.0; size.pow(4)],
            size,
        }
    }

    /// Build the tensor from unique chemist-notation integrals `(ij|kl)`.
    ///
    /// Every entry is expanded over the 8-fold permutational symmetry
    /// (ij|kl) = (ji|kl) = (ij|lk) = (ji|lk) = (kl|ij) = (lk|ij) = (kl|ji) = (lk|ji)
    pub fn from_chemist(
        size: usize,
        entries: &[(usize, usize, usize, usize, f64)],
    ) -> Result<Self> {
        let mut tensor = Self::zeros(size);

        for &(i, j, k, l, value) in entries {
            let largest = i.max(j).max(k).max(l);
            if largest >= size {
                return Err(NofError::DimensionMismatch {
                    what: "two-electron integral index",
                    expected: size,
                    found: largest + 1,
                });
            }

            for (a, b, c, d) in [
                (i, j, k, l),
                (j, i, k, l),
                (i, j, l, k),
                (j, i, l, k),
                (k, l, i, j),
                (l, k, i, j),
                (k, l, j, i),
                (l, k, j, i),
            ] {
                // (ab|cd) lives at I[a,c,d,b]
                let linear = tensor.linear(a, c, d, b);
                tensor.data[linear] = value;
            }
        }

        Ok(tensor)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline(always)]
    fn linear(&self, p: usize, q: usize, r: usize, s: usize) -> usize {
        ((p * self.size + q) * self.size + r) * self.size + s
    }
}

impl Index<(usize, usize, usize, usize)> for TwoElectronTensor {
    type Output = f64;

    fn index(&self, (p, q, r, s): (usize, usize, usize, usize)) -> &Self::Output {
        &self.data[self.linear(p, q, r, s)]
    }
}

/// Nuclear repulsion, one-electron and two-electron integrals of one molecule
#[derive(Debug, Clone)]
pub struct IntegralSet {
    pub nuclear_repulsion: f64,
    /// one-electron (core Hamiltonian) matrix, symmetric
    pub core_hamiltonian: DMatrix<f64>,
    pub eri: TwoElectronTensor,
}

impl IntegralSet {
    pub fn new(
        nuclear_repulsion: f64,
        core_hamiltonian: DMatrix<f64>,
        eri: TwoElectronTensor,
    ) -> Result<Self> {
        let norb = core_hamiltonian.nrows();
        if core_hamiltonian.ncols() != norb {
            return Err(NofError::DimensionMismatch {
                what: "one-electron matrix columns",
                expected: norb,
                found: core_hamiltonian.ncols(),
            });
        }
        if eri.size() != norb {
            return Err(NofError::DimensionMismatch {
                what: "two-electron tensor",
                expected: norb,
                found: eri.size(),
            });
        }

        Ok(Self {
            nuclear_repulsion,
            core_hamiltonian,
            eri,
        })
    }

    pub fn norb(&self) -> usize {
        self.core_hamiltonian.nrows()
    }
}

/// H2 in STO-3G at 0.7414 Å, molecular-orbital basis
#[cfg(test)]
pub(crate) fn h2_sto3g() -> IntegralSet {
    let h = DMatrix::from_row_slice(2, 2, &[-1.2524635735648981, 0.0, 0.0, -0.4759487152209648]);
    let eri = TwoElectronTensor::from_chemist(
        2,
        &[
            (0, 0, 0, 0, 0.6744887663568382),
            (1, 1, 1, 1, 0.6973979494693358),
            (0, 0, 1, 1, 0.6634680964235684),
            (0, 1, 0, 1, 0.18128880821149607),
        ],
    )
    .expect("valid H2 integrals");
    IntegralSet::new(0.7137539936876182, h, eri).expect("consistent H2 integrals")
}
