//! Unitary time evolution of pure states under transverse-field Ising
//! Hamiltonians.
//!
//! Propagators are built from the Hermitian eigendecomposition `H = V E V^T`
//! computed by LAPACK, as `U(t) = V exp(-i E t) V^T`. Where unspecified, the
//! last index of a 2D array corresponds to time.

use std::sync::Arc;
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    dynamics::diagonalize,
    error::{ IsingError, IsingResult },
    hilbert::{ Basis, SpinConfig },
};

pub mod schrodinger;

/// Compute a "norm" of an object, treating it as a representation of a quantum
/// state.
pub trait StateNorm {
    fn norm(&self) -> f64;
}

/// The norm of an `ndarray::Array1<num_complex::Complex64>` is the quadrature
/// sum of its elements.
impl StateNorm for nd::Array1<C64> {
    fn norm(&self) -> f64 { self.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt() }
}

/// Heap-allocated [`Fn`] trait object computing a pure state amplitude, given a
/// particular configuration.
pub type AmplitudeFn = Arc<dyn Fn(&SpinConfig) -> C64 + Send + Sync>;

/// Different descriptions for a pure state vector, convertible to the standard
/// 1D complex-valued array representation.
#[derive(Clone)]
pub enum Pure {
    /// A single basis state.
    Single(SpinConfig),
    /// A pre-constructed array. Will be renormalized.
    Array(nd::Array1<C64>),
    /// A functional form giving basis state amplitudes. Normalized upon
    /// instantiation as an array.
    Function(AmplitudeFn),
}

impl std::fmt::Debug for Pure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(s) => write!(f, "Single({:?})", s),
            Self::Array(a) => write!(f, "Array({:?})", a),
            Self::Function(_) => write!(f, "Function(...)"),
        }
    }
}

impl From<SpinConfig> for Pure {
    fn from(s: SpinConfig) -> Self { Self::Single(s) }
}

impl From<nd::Array1<C64>> for Pure {
    fn from(a: nd::Array1<C64>) -> Self { Self::Array(a) }
}

impl From<nd::Array1<f64>> for Pure {
    fn from(a: nd::Array1<f64>) -> Self { Self::Array(a.mapv(C64::from)) }
}

impl Pure {
    /// Create a new [`Self::Function`].
    pub fn from_func<F>(f: F) -> Self
    where F: Fn(&SpinConfig) -> C64 + Send + Sync + 'static
    {
        Self::Function(Arc::new(f))
    }

    /// Convert to a normalized 1D complex-valued array, if possible.
    ///
    /// The following conditions must be met by the resulting array.
    /// - must have length equal to that of `basis`
    /// - must have elements summing in quadrature to a non-zero, finite value
    pub fn into_array(self, basis: &Basis) -> Option<nd::Array1<C64>> {
        let a: nd::Array1<C64>
            = match self {
                Self::Single(s0) => basis.get_vector(&s0)?,
                Self::Array(a) => (a.len() == basis.len()).then_some(a)?,
                Self::Function(f) => basis.iter().map(f.as_ref()).collect(),
            };
        let norm = a.norm();
        (norm != 0.0 && norm.is_finite()).then_some(a)
            .map(|mut a| { a /= C64::from(norm); a })
    }
}

fn check_time(t: f64) -> IsingResult<()> {
    if t.is_finite() {
        Ok(())
    } else {
        Err(IsingError::InvalidParameter(
            format!("time must be finite, got {}", t)))
    }
}

fn phases(E: &nd::Array1<f64>, t: f64) -> nd::Array1<C64> {
    E.mapv(|e| (-C64::i() * e * t).exp())
}

/// Compute the unitary propagator `exp(-i t H)` for a real symmetric
/// Hamiltonian.
pub fn propagator(H: &nd::Array2<f64>, t: f64) -> IsingResult<nd::Array2<C64>> {
    check_time(t)?;
    let (E, V) = diagonalize(H)?;
    let V: nd::Array2<C64> = V.mapv(C64::from);
    let VU: nd::Array2<C64> = &V * &phases(&E, t);
    Ok(VU.dot(&V.t()))
}

/// Compute `exp(-i t H) psi` for a real symmetric Hamiltonian.
pub fn propagate(psi: &nd::Array1<C64>, H: &nd::Array2<f64>, t: f64)
    -> IsingResult<nd::Array1<C64>>
{
    check_time(t)?;
    if psi.len() != H.nrows() {
        return Err(IsingError::InvalidArgument(
            format!(
                "state has length {}, hamiltonian has dimension {}",
                psi.len(), H.nrows(),
            )
        ));
    }
    let (E, V) = diagonalize(H)?;
    let V: nd::Array2<C64> = V.mapv(C64::from);
    let c: nd::Array1<C64> = V.t().dot(psi);
    Ok(V.dot(&(&c * &phases(&E, t))))
}
