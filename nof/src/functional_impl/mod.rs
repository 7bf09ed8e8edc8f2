//! Natural Orbital Functionals
//!
//! A functional approximates the two-electron energy as a closed-form
//! expression of occupation numbers `n` and the Coulomb/exchange integrals
//! over natural orbitals. Each variant is a pair of pure functions:
//!
//! - a coefficient builder `(n, F) -> (A, B, C, Δ)`
//! - an energy combination `(n, A, B, Δ, J, K) -> E2`
//!
//! with `A[p,q] = 2 n_p n_q` and `C = 0` for every variant. `F` is the Fermi
//! level (electrons / 2) separating strongly occupied orbitals `[0, F)` from
//! weakly occupied ones `[F, norb)`.
//!
//! # Available functionals
//!
//! - **HF**: Hartree-Fock-like product ansatz without self-interaction terms
//! - **GU**: Goedecker-Umrigar, square-root exchange with self-interaction removed
//! - **BBC2**: Buijse-Baerends corrections, HF-like among strongly occupied orbitals
//! - **BBAC3**: BBC3 with damping functions blending the diagonal and cross blocks
//! - **PNOF3** / **PNOF4**: Piris cumulant functionals with `Δ` and `Π` matrices

mod coefficients;
mod functional;

pub use coefficients::{
    damping, scan_domain, CoefficientMatrices, DomainPolicy, DomainViolation, DAMPING_CROSS,
    DAMPING_DIAGONAL,
};
pub use functional::Functional;
