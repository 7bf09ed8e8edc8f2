//! Integral transformation into the natural-orbital basis
//!
//! Only the one-electron matrix and the two-index Coulomb/exchange
//! contractions are needed by the functionals:
//!
//! J[p,q] = Σ_ijkl I[i,j,k,l] C_ip C_jq C_kq C_lp
//! K[p,q] = Σ_ijkl I[i,j,k,l] C_ip C_jp C_kq C_lq
//!
//! Both share the first quarter transformation over `i`, which is the only
//! O(N^5) step. The remaining contractions are O(N^4) per orbital pair row.

extern crate nalgebra as na;

use crate::error::{NofError, Result};
use crate::integrals::{IntegralSet, TwoElectronTensor};
use na::DMatrix;
use rayon::prelude::*;

/// One-electron, Coulomb and exchange integrals over natural orbitals
#[derive(Debug, Clone)]
pub struct NaturalOrbitalIntegrals {
    pub h: DMatrix<f64>,
    pub j: DMatrix<f64>,
    pub k: DMatrix<f64>,
}

/// Rotate `integrals` with the orbital coefficients `vecs` (columns = new orbitals)
pub fn transform_integrals(
    integrals: &IntegralSet,
    vecs: &DMatrix<f64>,
) -> Result<NaturalOrbitalIntegrals> {
    let n = integrals.norb();
    if vecs.nrows() != n || vecs.ncols() != n {
        return Err(NofError::DimensionMismatch {
            what: "orbital rotation",
            expected: n,
            found: vecs.nrows().max(vecs.ncols()),
        });
    }

    let h = vecs.transpose() * &integrals.core_hamiltonian * vecs;
    let (j, k) = coulomb_exchange(&integrals.eri, vecs);

    Ok(NaturalOrbitalIntegrals { h, j, k })
}

/// J and K in the rotated basis, one row `p` per rayon task
fn coulomb_exchange(eri: &TwoElectronTensor, vecs: &DMatrix<f64>) -> (DMatrix<f64>, DMatrix<f64>) {
    let n = eri.size();
    let data = eri.as_slice();

    let rows: Vec<(Vec<f64>, Vec<f64>)> = (0..n)
        .into_par_iter()
        .map(|p| {
            // Y[j,k,l] = Σ_i I[i,j,k,l] C_ip
            let mut y = vec![0.0; n * n * n];
            for i in 0..n {
                let c_ip = vecs[(i, p)];
                if c_ip == 0.0 {
                    continue;
                }
                let block = &data[i * n * n * n..(i + 1) * n * n * n];
                for (acc, value) in y.iter_mut().zip(block) {
                    *acc += c_ip * value;
                }
            }

            // X[j,k] = Σ_l Y[j,k,l] C_lp   (Coulomb side)
            // Z[k,l] = Σ_j Y[j,k,l] C_jp   (exchange side)
            let mut x = DMatrix::<f64>::zeros(n, n);
            let mut z = DMatrix::<f64>::zeros(n, n);
            for j in 0..n {
                let c_jp = vecs[(j, p)];
                for k in 0..n {
                    for l in 0..n {
                        let value = y[(j * n + k) * n + l];
                        x[(j, k)] += value * vecs[(l, p)];
                        z[(k, l)] += value * c_jp;
                    }
                }
            }

            // J[p,q] = C_q^T X C_q,  K[p,q] = C_q^T Z C_q
            let mut j_row = vec![0.0; n];
            let mut k_row = vec![0.0; n];
            for q in 0..n {
                let c_q = vecs.column(q);
                j_row[q] = c_q.dot(&(&x * c_q));
                k_row[q] = c_q.dot(&(&z * c_q));
            }

            (j_row, k_row)
        })
        .collect();

    let mut j = DMatrix::zeros(n, n);
    let mut k = DMatrix::zeros(n, n);
    for (p, (j_row, k_row)) in rows.into_iter().enumerate() {
        for q in 0..n {
            j[(p, q)] = j_row[q];
            k[(p, q)] = k_row[q];
        }
    }

    (j, k)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chemist-notation integrals with generic, non-degenerate values
    fn sample_integrals(n: usize) -> IntegralSet {
        let mut entries = Vec::new();
        for i in 0..n {
            for j in 0..=i {
                for k in 0..n {
                    for l in 0..=k {
                        if i * (i + 1) / 2 + j >= k * (k + 1) / 2 + l {
                            let value = 0.1 + 0.05 * ((i + 2 * j + 3 * k + 5 * l) % 7) as f64
                                + if i == j && k == l { 0.4 } else { 0.0 };
                            entries.push((i, j, k, l, value));
                        }
                    }
                }
            }
        }
        let eri = TwoElectronTensor::from_chemist(n, &entries).unwrap();
        let h = DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                -1.0 + 0.3 * i as f64
            } else {
                0.05 * (i + j) as f64
            }
        });
        IntegralSet::new(0.5, h, eri).unwrap()
    }

    /// Orthogonal matrix from a product of Givens rotations
    fn rotation(n: usize) -> DMatrix<f64> {
        let mut u = DMatrix::<f64>::identity(n, n);
        for a in 0..n {
            for b in a + 1..n {
                let angle = 0.3 + 0.17 * (a + 2 * b) as f64;
                let mut g = DMatrix::<f64>::identity(n, n);
                g[(a, a)] = angle.cos();
                g[(b, b)] = angle.cos();
                g[(a, b)] = -angle.sin();
                g[(b, a)] = angle.sin();
                u = u * g;
            }
        }
        u
    }

    fn naive(integrals: &IntegralSet, c: &DMatrix<f64>) -> (DMatrix<f64>, DMatrix<f64>) {
        let n = integrals.norb();
        let eri = &integrals.eri;
        let mut j = DMatrix::zeros(n, n);
        let mut k = DMatrix::zeros(n, n);
        for p in 0..n {
            for q in 0..n {
                for a in 0..n {
                    for b in 0..n {
                        for e in 0..n {
                            for d in 0..n {
                                let v = eri[(a, b, e, d)];
                                j[(p, q)] += v * c[(a, p)] * c[(b, q)] * c[(e, q)] * c[(d, p)];
                                k[(p, q)] += v * c[(a, p)] * c[(b, p)] * c[(e, q)] * c[(d, q)];
                            }
                        }
                    }
                }
            }
        }
        (j, k)
    }

    #[test]
    fn test_identity_rotation_reproduces_direct_integrals() {
        let integrals = sample_integrals(3);
        let no = transform_integrals(&integrals, &DMatrix::identity(3, 3)).unwrap();

        assert!((&no.h - &integrals.core_hamiltonian).abs().max() < 1e-14);
        for p in 0..3 {
            for q in 0..3 {
                assert!((no.j[(p, q)] - integrals.eri[(p, q, q, p)]).abs() < 1e-14);
                assert!((no.k[(p, q)] - integrals.eri[(p, p, q, q)]).abs() < 1e-14);
            }
            // J and K coincide on the diagonal: both are (pp|pp)
            assert!((no.j[(p, p)] - no.k[(p, p)]).abs() < 1e-14);
        }
    }

    #[test]
    fn test_factorized_contraction_matches_naive() {
        let integrals = sample_integrals(4);
        let c = rotation(4);
        let no = transform_integrals(&integrals, &c).unwrap();
        let (j_ref, k_ref) = naive(&integrals, &c);

        assert!((&no.j - &j_ref).abs().max() < 1e-12);
        assert!((&no.k - &k_ref).abs().max() < 1e-12);
    }

    #[test]
    fn test_coulomb_and_exchange_are_symmetric() {
        let integrals = sample_integrals(3);
        let no = transform_integrals(&integrals, &rotation(3)).unwrap();

        assert!((&no.j - no.j.transpose()).abs().max() < 1e-12);
        assert!((&no.k - no.k.transpose()).abs().max() < 1e-12);
        assert!((&no.h - no.h.transpose()).abs().max() < 1e-12);
    }

    #[test]
    fn test_rotation_shape_is_checked() {
        let integrals = sample_integrals(2);
        assert!(transform_integrals(&integrals, &DMatrix::identity(3, 3)).is_err());
    }
}
