//! The RDM source interface and a closure-backed implementation

use crate::error::{NofError, Result};

/// Maps ansatz parameters to the triangular alpha-spin 1-RDM
pub trait RdmSource {
    /// Number of spatial orbitals of the measured RDM
    fn norb(&self) -> usize;

    /// Number of ansatz parameters accepted by [`RdmSource::measure`]
    fn n_parameters(&self) -> usize;

    /// Blocking measurement of the RDM, length `norb*(norb+1)/2`
    fn measure(&self, params: &[f64]) -> Result<Vec<f64>>;
}

/// RDM computed directly from the parameters by a closure
pub struct DirectRdm<F> {
    norb: usize,
    n_parameters: usize,
    func: F,
}

impl<F> DirectRdm<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    pub fn new(norb: usize, n_parameters: usize, func: F) -> Self {
        Self {
            norb,
            n_parameters,
            func,
        }
    }
}

impl<F> RdmSource for DirectRdm<F>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn norb(&self) -> usize {
        self.norb
    }

    fn n_parameters(&self) -> usize {
        self.n_parameters
    }

    fn measure(&self, params: &[f64]) -> Result<Vec<f64>> {
        if params.len() != self.n_parameters {
            return Err(NofError::ParameterMismatch {
                expected: self.n_parameters,
                found: params.len(),
            });
        }
        Ok((self.func)(params))
    }
}
