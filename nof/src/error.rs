//! Error type shared by every stage of the NOF pipeline

use std::fmt;

/// Which occupation product left its domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductKind {
    /// `n_p n_q`
    Occupation,
    /// `(1 - n_p)(1 - n_q)`, used by the PNOF cumulants
    Hole,
}

impl ProductKind {
    pub fn label(&self, p: usize, q: usize) -> String {
        match self {
            ProductKind::Occupation => format!("n[{p}]*n[{q}]"),
            ProductKind::Hole => format!("(1-n[{p}])*(1-n[{q}])"),
        }
    }
}

/// Failures that abort a single energy evaluation or the construction of a context
#[derive(Debug, Clone, PartialEq)]
pub enum NofError {
    /// The RDM vector length is not a triangular number `norb*(norb+1)/2`
    ShapeMismatch { len: usize },
    /// Two inputs disagree on the orbital count
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Unrecognized functional selector
    InvalidFunctionalId(String),
    /// An occupation product fell below the noise tolerance (strict mode only)
    NumericalDomain {
        p: usize,
        q: usize,
        kind: ProductKind,
        product: f64,
    },
    /// Odd electron count, or more electron pairs than orbitals
    InvalidElectronCount { n_electrons: usize, norb: usize },
    /// Parameter vector length differs from what the ansatz expects
    ParameterMismatch { expected: usize, found: usize },
    /// Malformed excitation gate in an ansatz description
    InvalidGate(String),
    /// The assembled energy is NaN or infinite
    NonFiniteEnergy,
}

impl fmt::Display for NofError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NofError::ShapeMismatch { len } => write!(
                f,
                "RDM vector of length {len} does not match norb*(norb+1)/2 for any orbital count"
            ),
            NofError::DimensionMismatch {
                what,
                expected,
                found,
            } => write!(f, "{what}: expected dimension {expected}, found {found}"),
            NofError::InvalidFunctionalId(id) => write!(
                f,
                "unknown functional '{id}' (expected one of hf, gu, bbac3, bbc2, pnof3, pnof4)"
            ),
            NofError::NumericalDomain {
                p,
                q,
                kind,
                product,
            } => write!(
                f,
                "{} = {product:.3e} is negative beyond the noise tolerance",
                kind.label(*p, *q)
            ),
            NofError::InvalidElectronCount { n_electrons, norb } => write!(
                f,
                "{n_electrons} electrons cannot form a closed shell in {norb} spatial orbitals"
            ),
            NofError::ParameterMismatch { expected, found } => {
                write!(f, "expected {expected} ansatz parameters, found {found}")
            }
            NofError::InvalidGate(msg) => write!(f, "invalid excitation gate: {msg}"),
            NofError::NonFiniteEnergy => {
                write!(f, "energy evaluation produced a non-finite value")
            }
        }
    }
}

impl std::error::Error for NofError {}

pub type Result<T> = std::result::Result<T, NofError>;
