//! Real-amplitude statevector simulation of excitation-gate circuits
//!
//! Spin orbitals are mapped onto wires with the Jordan-Wigner encoding:
//! wire `2p` holds the alpha spin of spatial orbital `p` and wire `2p+1` the
//! beta spin. Basis state `k` has wire `w` occupied when bit `w` of `k` is set.

use super::source::RdmSource;
use crate::error::{NofError, Result};
use crate::natural_orbitals::triangular_index;
use serde::{Deserialize, Serialize};

/// Particle-conserving Givens rotation acting on two or four wires
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExcitationGate {
    Single { wires: [usize; 2], param: usize },
    Double { wires: [usize; 4], param: usize },
}

impl ExcitationGate {
    pub fn wires(&self) -> &[usize] {
        match self {
            ExcitationGate::Single { wires, .. } => wires,
            ExcitationGate::Double { wires, .. } => wires,
        }
    }

    pub fn param(&self) -> usize {
        match self {
            ExcitationGate::Single { param, .. } | ExcitationGate::Double { param, .. } => *param,
        }
    }

    /// Rotate the `lower`/`upper` amplitude pair of every basis state.
    ///
    /// `lower` has the second half of the wires occupied and `upper` the
    /// first half, so `|0011>` maps to `c|0011> + s|1100>`.
    fn apply(&self, state: &mut [f64], theta: f64) {
        let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
        let wires = self.wires();
        let half = wires.len() / 2;
        let first: usize = wires[..half].iter().map(|w| 1usize << w).sum();
        let second: usize = wires[half..].iter().map(|w| 1usize << w).sum();
        let mask = first | second;

        for index in 0..state.len() {
            // visit each pair once, from its `lower` member
            if index & mask != second {
                continue;
            }
            let lower = index;
            let upper = (index & !mask) | first;
            let (a_lower, a_upper) = (state[lower], state[upper]);
            state[lower] = c * a_lower - s * a_upper;
            state[upper] = s * a_lower + c * a_upper;
        }
    }
}

/// Largest spin-orbital register simulated (2^24 amplitudes)
pub const MAX_WIRES: usize = 24;

/// Alpha-spin 1-RDM measured on a simulated excitation circuit
#[derive(Debug, Clone)]
pub struct StatevectorRdm {
    norb: usize,
    n_electrons: usize,
    n_parameters: usize,
    gates: Vec<ExcitationGate>,
}

impl StatevectorRdm {
    pub fn new(norb: usize, n_electrons: usize, gates: Vec<ExcitationGate>) -> Result<Self> {
        if norb > MAX_WIRES / 2 {
            return Err(NofError::DimensionMismatch {
                what: "statevector wires (maximum)",
                expected: MAX_WIRES,
                found: norb.saturating_mul(2),
            });
        }
        let n_wires = 2 * norb;
        if n_electrons > n_wires {
            return Err(NofError::InvalidElectronCount { n_electrons, norb });
        }

        for gate in &gates {
            let wires = gate.wires();
            if let Some(wire) = wires.iter().find(|w| **w >= n_wires) {
                return Err(NofError::InvalidGate(format!(
                    "wire {} out of range for {} wires",
                    wire, n_wires
                )));
            }
            let distinct = wires
                .iter()
                .enumerate()
                .all(|(i, w)| !wires[..i].contains(w));
            if !distinct {
                return Err(NofError::InvalidGate(format!(
                    "repeated wire in {:?}",
                    wires
                )));
            }
        }

        let n_parameters = gates.iter().map(|g| g.param() + 1).max().unwrap_or(0);

        Ok(Self {
            norb,
            n_electrons,
            n_parameters,
            gates,
        })
    }

    pub fn gates(&self) -> &[ExcitationGate] {
        &self.gates
    }

    /// Amplitudes after the circuit, starting from the reference determinant
    pub fn prepare(&self, params: &[f64]) -> Result<Vec<f64>> {
        if params.len() != self.n_parameters {
            return Err(NofError::ParameterMismatch {
                expected: self.n_parameters,
                found: params.len(),
            });
        }

        let mut state = vec![0.0; 1 << (2 * self.norb)];
        state[(1 << self.n_electrons) - 1] = 1.0;

        for gate in &self.gates {
            gate.apply(&mut state, params[gate.param()]);
        }
        Ok(state)
    }

    /// `<a†_{2p} a_{2q}>` with Jordan-Wigner parity signs
    fn alpha_element(state: &[f64], p: usize, q: usize) -> f64 {
        let (wire_p, wire_q) = (2 * p, 2 * q);
        let mut value = 0.0;

        for (index, amplitude) in state.iter().enumerate() {
            if *amplitude == 0.0 || index & (1 << wire_q) == 0 {
                continue;
            }
            let annihilated = index ^ (1 << wire_q);
            if annihilated & (1 << wire_p) != 0 {
                continue;
            }
            let created = annihilated | (1 << wire_p);

            let parity = (index & ((1 << wire_q) - 1)).count_ones()
                + (annihilated & ((1 << wire_p) - 1)).count_ones();
            let sign = if parity % 2 == 0 { 1.0 } else { -1.0 };

            value += sign * state[created] * amplitude;
        }
        value
    }
}

impl RdmSource for StatevectorRdm {
    fn norb(&self) -> usize {
        self.norb
    }

    fn n_parameters(&self) -> usize {
        self.n_parameters
    }

    fn measure(&self, params: &[f64]) -> Result<Vec<f64>> {
        let state = self.prepare(params)?;
        let mut rdm = vec![0.0; self.norb * (self.norb + 1) / 2];
        for p in 0..self.norb {
            for q in p..self.norb {
                rdm[triangular_index(self.norb, p, q)] = Self::alpha_element(&state, p, q);
            }
        }
        Ok(rdm)
    }
}
