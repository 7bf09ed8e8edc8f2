//! Coefficient matrices of the supported functionals

use super::Functional;
use crate::error::{NofError, ProductKind, Result};
use nalgebra::{DMatrix, DVector};
use tracing::warn;

/// Damping strength on the diagonal of BBAC3
pub const DAMPING_DIAGONAL: f64 = 1.4423;
/// Damping strength on the strong/weak cross block of BBAC3
pub const DAMPING_CROSS: f64 = 1.5552;

/// Occupation products below `-noise_tolerance` are reported. The square
/// roots themselves always take absolute values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainPolicy {
    pub noise_tolerance: f64,
    /// turn the warning into [`NofError::NumericalDomain`]
    pub strict: bool,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        DomainPolicy {
            noise_tolerance: 1e-8,
            strict: false,
        }
    }
}

/// Per-functional coefficient matrices, rebuilt whenever the occupations change
#[derive(Debug, Clone)]
pub struct CoefficientMatrices {
    /// Coulomb weights, `2 n_p n_q` for every functional
    pub a: DMatrix<f64>,
    /// exchange weights (functional specific)
    pub b: DMatrix<f64>,
    /// time-inversion weights, zero for real orbitals
    pub c: DMatrix<f64>,
    /// cumulant correction to the Coulomb weights (PNOF only, zero otherwise)
    pub delta: DMatrix<f64>,
}

impl CoefficientMatrices {
    fn with_exchange(n: &DVector<f64>, b: DMatrix<f64>) -> Self {
        let norb = n.len();
        CoefficientMatrices {
            a: coulomb_weights(n),
            b,
            c: DMatrix::zeros(norb, norb),
            delta: DMatrix::zeros(norb, norb),
        }
    }
}

/// `D(x) = P(x)^2 / (1 + P(x)^2)` with `P(x) = a x^2 (x^2 - 2)`
pub fn damping(x: f64, strength: f64) -> f64 {
    let x2 = x * x;
    let poly = strength * x2 * (x2 - 2.0);
    let poly2 = poly * poly;
    poly2 / (1.0 + poly2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Diagonal,
    Strong,
    Weak,
    Cross,
}

/// Region of `(p, q)` relative to the Fermi level. The diagonal wins over
/// the strong/weak blocks.
fn block(p: usize, q: usize, fermi: usize) -> Block {
    if p == q {
        Block::Diagonal
    } else if p < fermi && q < fermi {
        Block::Strong
    } else if p >= fermi && q >= fermi {
        Block::Weak
    } else {
        Block::Cross
    }
}

fn coulomb_weights(n: &DVector<f64>) -> DMatrix<f64> {
    let norb = n.len();
    DMatrix::from_fn(norb, norb, |p, q| 2.0 * n[p] * n[q])
}

/// Most negative occupation product found by [`scan_domain`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainViolation {
    pub p: usize,
    pub q: usize,
    pub kind: ProductKind,
    pub product: f64,
    /// number of products below the tolerance
    pub count: usize,
}

/// Find occupation products (and hole products for PNOF) below `-noise_tolerance`
pub fn scan_domain(
    functional: &Functional,
    n: &DVector<f64>,
    noise_tolerance: f64,
) -> Option<DomainViolation> {
    let norb = n.len();
    let uses_holes = matches!(functional, Functional::PNOF3 | Functional::PNOF4);

    let mut worst: Option<DomainViolation> = None;
    let mut count = 0usize;
    for p in 0..norb {
        for q in p..norb {
            let mut products = vec![(ProductKind::Occupation, n[p] * n[q])];
            if uses_holes {
                products.push((ProductKind::Hole, (1.0 - n[p]) * (1.0 - n[q])));
            }
            for (kind, product) in products {
                if product >= -noise_tolerance {
                    continue;
                }
                count += 1;
                if worst.map_or(true, |w| product < w.product) {
                    worst = Some(DomainViolation {
                        p,
                        q,
                        kind,
                        product,
                        count: 0,
                    });
                }
            }
        }
    }

    worst.map(|w| DomainViolation { count, ..w })
}

/// Warn about (or reject) occupation products that are negative beyond noise
pub(super) fn check_domain(
    functional: &Functional,
    n: &DVector<f64>,
    policy: &DomainPolicy,
) -> Result<()> {
    if let Some(violation) = scan_domain(functional, n, policy.noise_tolerance) {
        let DomainViolation {
            p,
            q,
            kind,
            product,
            count,
        } = violation;
        if policy.strict {
            return Err(NofError::NumericalDomain {
                p,
                q,
                kind,
                product,
            });
        }
        warn!(
            "{} occupation products below -{:.1e} for {}; most negative {} = {:.3e}",
            count,
            policy.noise_tolerance,
            functional,
            kind.label(p, q),
            product
        );
    }

    Ok(())
}

/// `B[p,q] = n_p n_q`
pub(super) fn hf(n: &DVector<f64>) -> CoefficientMatrices {
    let norb = n.len();
    let b = DMatrix::from_fn(norb, norb, |p, q| n[p] * n[q]);
    CoefficientMatrices::with_exchange(n, b)
}

/// `B[p,q] = sqrt|n_p n_q|` off the diagonal, `n_p^2` on it
pub(super) fn gu(n: &DVector<f64>) -> CoefficientMatrices {
    let norb = n.len();
    let b = DMatrix::from_fn(norb, norb, |p, q| {
        if p == q {
            n[p] * n[p]
        } else {
            (n[p] * n[q]).abs().sqrt()
        }
    });
    CoefficientMatrices::with_exchange(n, b)
}

/// BBC2 exchange weights: GU with HF-like strong/strong and sign-flipped
/// weak/weak interactions
pub(super) fn bbc2(n: &DVector<f64>, fermi: usize) -> CoefficientMatrices {
    let norb = n.len();
    let b = DMatrix::from_fn(norb, norb, |p, q| {
        let product = n[p] * n[q];
        match block(p, q, fermi) {
            Block::Diagonal => n[p] * n[p],
            Block::Strong => product,
            Block::Weak => -product.abs().sqrt(),
            Block::Cross => product.abs().sqrt(),
        }
    });
    CoefficientMatrices::with_exchange(n, b)
}

/// The raw BBAC3 matrix and its damping matrix; `B = (1 - D) ⊙ C_raw`
pub(crate) fn bbac3_components(n: &DVector<f64>, fermi: usize) -> (DMatrix<f64>, DMatrix<f64>) {
    let norb = n.len();
    let mut c_raw = DMatrix::zeros(norb, norb);
    let mut damp = DMatrix::zeros(norb, norb);

    for p in 0..norb {
        for q in 0..norb {
            let product = n[p] * n[q];
            let root = product.abs().sqrt();
            let (raw, d) = match block(p, q, fermi) {
                Block::Diagonal => (
                    -2.0 * root + 2.0 * product,
                    damping(2.0 * n[p] - 1.0, DAMPING_DIAGONAL),
                ),
                Block::Strong => (-2.0 * root + 2.0 * product, 1.0),
                Block::Weak => (2.0 * root + 2.0 * product, 0.0),
                Block::Cross => (
                    -2.0 * root + 2.0 * product,
                    damping(2.0 * n[p] + 2.0 * n[q] - 2.0, DAMPING_CROSS),
                ),
            };
            c_raw[(p, q)] = raw;
            damp[(p, q)] = d;
        }
    }

    (c_raw, damp)
}

pub(super) fn bbac3(n: &DVector<f64>, fermi: usize) -> CoefficientMatrices {
    let (c_raw, damp) = bbac3_components(n, fermi);
    let b = damp.map(|d| 1.0 - d).component_mul(&c_raw);
    CoefficientMatrices::with_exchange(n, b)
}

/// Sum of the weak occupations, `S_F`
fn weak_occupation(n: &DVector<f64>, fermi: usize) -> f64 {
    n.iter().skip(fermi).sum()
}

/// Below this `S_F` the strong/weak cumulant entries are dropped
const MIN_WEAK_OCCUPATION: f64 = 1e-12;

/// PNOF cumulant `Δ[q,p]`, shared by PNOF3 and PNOF4
fn pnof_delta(n: &DVector<f64>, fermi: usize) -> DMatrix<f64> {
    let norb = n.len();
    let s_f = weak_occupation(n, fermi);

    DMatrix::from_fn(norb, norb, |q, p| {
        let (hq, hp) = (1.0 - n[q], 1.0 - n[p]);
        match block(q, p, fermi) {
            Block::Diagonal => 0.0,
            Block::Strong => hq * hp,
            Block::Weak => n[q] * n[p],
            Block::Cross if s_f < MIN_WEAK_OCCUPATION => 0.0,
            Block::Cross if q < fermi => hq * n[p] * (1.0 - s_f) / s_f,
            Block::Cross => n[q] * hp * (1.0 - s_f) / s_f,
        }
    })
}

fn pnof(
    n: &DVector<f64>,
    fermi: usize,
    cross: impl Fn(usize, usize, f64) -> f64,
) -> CoefficientMatrices {
    let norb = n.len();
    let s_f = weak_occupation(n, fermi);

    let pi = DMatrix::from_fn(norb, norb, |q, p| {
        let (hq, hp) = (1.0 - n[q], 1.0 - n[p]);
        match block(q, p, fermi) {
            Block::Diagonal => 0.0,
            Block::Strong => -(hq * hp).abs().sqrt(),
            Block::Weak => (n[q] * n[p]).abs().sqrt(),
            Block::Cross => cross(q, p, s_f),
        }
    });

    CoefficientMatrices {
        a: coulomb_weights(n),
        b: pi,
        c: DMatrix::zeros(norb, norb),
        delta: pnof_delta(n, fermi),
    }
}

pub(super) fn pnof3(n: &DVector<f64>, fermi: usize) -> CoefficientMatrices {
    pnof(n, fermi, |q, p, _| -(n[q] * n[p]).abs().sqrt())
}

pub(super) fn pnof4(n: &DVector<f64>, fermi: usize) -> CoefficientMatrices {
    pnof(n, fermi, |q, p, s_f| {
        if s_f < MIN_WEAK_OCCUPATION {
            return 0.0;
        }
        // (strong, weak) ordering of the pair
        let (strong, weak) = if q < fermi { (q, p) } else { (p, q) };
        let ratio = (1.0 - n[strong]) * n[weak] / s_f;
        -(ratio * (n[strong] - n[weak] + ratio)).abs().sqrt()
    })
}
