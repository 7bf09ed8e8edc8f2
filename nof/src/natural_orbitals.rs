//! Natural orbitals from a triangular 1-RDM
//!
//! The RDM source reports the upper triangle of the alpha-spin 1-RDM in
//! row-major order: (0,0), (0,1), ..., (0,n-1), (1,1), ..., (n-1,n-1).
//! Diagonalizing the reconstructed matrix yields occupation numbers and the
//! rotation from the reference orbitals to the natural orbitals.

extern crate nalgebra as na;

use crate::error::{NofError, Result};
use na::{DMatrix, DVector, SymmetricEigen};

/// Occupation numbers (descending) and the matching orbital rotation
#[derive(Debug, Clone)]
pub struct OrbitalBasis {
    pub occupations: DVector<f64>,
    /// columns are the natural orbitals expressed in the reference basis
    pub vecs: DMatrix<f64>,
}

impl OrbitalBasis {
    pub fn norb(&self) -> usize {
        self.occupations.len()
    }

    /// Rebuild the 1-RDM as `vecs * diag(n) * vecs^T`
    pub fn density(&self) -> DMatrix<f64> {
        &self.vecs * DMatrix::from_diagonal(&self.occupations) * self.vecs.transpose()
    }

    /// Electrons of one spin, i.e. the trace of the alpha 1-RDM
    pub fn alpha_electrons(&self) -> f64 {
        self.occupations.sum()
    }
}

/// Orbital count for a triangular vector of length `len`
pub fn norb_from_triangular(len: usize) -> Result<usize> {
    // len = n(n+1)/2  =>  n = (sqrt(8 len + 1) - 1) / 2
    let estimate = ((((8 * len + 1) as f64).sqrt() - 1.0) / 2.0).round() as usize;
    if len == 0 || estimate * (estimate + 1) / 2 != len {
        return Err(NofError::ShapeMismatch { len });
    }
    Ok(estimate)
}

/// Position of `(p, q)` with `p <= q` in the row-major upper triangle
#[inline]
pub fn triangular_index(norb: usize, p: usize, q: usize) -> usize {
    let (p, q) = if p <= q { (p, q) } else { (q, p) };
    p * norb - p * (p + 1) / 2 + q
}

/// Symmetric matrix from its row-major upper triangle
pub fn unpack_triangular(values: &[f64]) -> Result<DMatrix<f64>> {
    let norb = norb_from_triangular(values.len())?;
    let mut gamma = DMatrix::zeros(norb, norb);

    let mut index = 0;
    for p in 0..norb {
        for q in p..norb {
            gamma[(p, q)] = values[index];
            gamma[(q, p)] = values[index];
            index += 1;
        }
    }

    Ok(gamma)
}

/// Row-major upper triangle of a square matrix
pub fn pack_triangular(matrix: &DMatrix<f64>) -> Vec<f64> {
    let norb = matrix.nrows();
    let mut values = Vec::with_capacity(norb * (norb + 1) / 2);
    for p in 0..norb {
        for q in p..norb {
            values.push(matrix[(p, q)]);
        }
    }
    values
}

/// Diagonalize the 1-RDM given as a triangular vector.
///
/// Occupations come out sorted descending with the eigenvector columns
/// permuted identically. Each column is signed so that its largest-magnitude
/// component is positive. Occupations are not clamped to [0, 1].
pub fn decompose(rdm: &[f64]) -> Result<OrbitalBasis> {
    let gamma = unpack_triangular(rdm)?;
    Ok(decompose_matrix(gamma))
}

/// Diagonalize an already reconstructed symmetric 1-RDM
pub fn decompose_matrix(gamma: DMatrix<f64>) -> OrbitalBasis {
    let eigs = SymmetricEigen::new(gamma);

    let mut pairs = eigs
        .eigenvalues
        .iter()
        .copied()
        .zip(eigs.eigenvectors.column_iter().map(|c| c.into_owned()))
        .collect::<Vec<_>>();

    pairs.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    let (values, vectors): (Vec<_>, Vec<_>) = pairs
        .into_iter()
        .map(|(value, mut vector)| {
            let pivot = vector.iamax();
            if vector[pivot] < 0.0 {
                vector.neg_mut();
            }
            (value, vector)
        })
        .unzip();

    OrbitalBasis {
        occupations: DVector::from_vec(values),
        vecs: DMatrix::from_columns(&vectors),
    }
}
