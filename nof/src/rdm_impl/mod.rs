//! 1-RDM sources
//!
//! The energy pipeline only needs the alpha-spin 1-RDM of the prepared state,
//! reported as its row-major upper triangle. Anything that can map ansatz
//! parameters to that vector can drive the optimizer:
//!
//! - [`DirectRdm`]: wraps a closure, used for deterministic stand-ins
//! - [`StatevectorRdm`]: simulates an excitation-gate circuit on a real
//!   statevector and measures `<a†_pα a_qα>`

mod source;
mod statevector;
#[cfg(test)]
mod tests;

pub use source::{DirectRdm, RdmSource};
pub use statevector::{ExcitationGate, StatevectorRdm, MAX_WIRES};
