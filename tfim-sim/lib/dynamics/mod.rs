//! Constructs to build transverse-field Ising Hamiltonians and diagonalize
//! them.

use std::sync::Arc;
use ndarray::{ self as nd, s };
use ndarray_linalg::{ Eigh, UPLO };
use crate::error::{ IsingError, IsingResult };

pub mod hamiltonians;
pub use hamiltonians::{
    transverse_ising::{
        HBuilderTransverseIsing,
        HTransverseIsingParams,
        build_hamiltonian,
    },
    HBuild,
};

/// Heap-allocated, thread-safe [`Fn`] trait object giving the transverse field
/// strength as a function of time.
pub type FieldFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Parameterization of the transverse field.
#[derive(Clone)]
pub enum FieldParams {
    /// Constant field strength `h`.
    Constant {
        h: f64,
    },
    /// Time-varied field strength `h(t)`.
    Variable {
        h: FieldFn,
    },
}

impl std::fmt::Debug for FieldParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant { h } => write!(f, "Constant {{ h: {:?} }}", h),
            Self::Variable { h: _ } => write!(f, "Variable {{ h: Arc<...> }}"),
        }
    }
}

impl From<f64> for FieldParams {
    fn from(h: f64) -> Self { Self::Constant { h } }
}

impl FieldParams {
    /// Create a new `FieldParams::Constant`.
    pub fn new_constant(h: f64) -> Self { Self::Constant { h } }

    /// Create a new `FieldParams::Variable`.
    pub fn new_variable<F>(h: F) -> Self
    where F: Fn(f64) -> f64 + Send + Sync + 'static
    {
        Self::Variable { h: Arc::new(h) }
    }

    /// Return `true` if the field does not depend on time.
    pub fn is_constant(&self) -> bool { matches!(self, Self::Constant { .. }) }

    /// Compute the field strength at a given time.
    ///
    /// Fails if `t` or the resulting field strength is non-finite.
    pub fn gen_at(&self, t: f64) -> IsingResult<f64> {
        if !t.is_finite() {
            return Err(IsingError::InvalidParameter(
                format!("time must be finite, got {}", t)));
        }
        let h = match self {
            Self::Constant { h } => *h,
            Self::Variable { h } => h(t),
        };
        check_field(h)?;
        Ok(h)
    }

    /// Compute the field strength over an array of time coordinates.
    pub fn gen_time_dep(&self, time: &nd::Array1<f64>)
        -> IsingResult<nd::Array1<f64>>
    {
        time.iter()
            .map(|t| self.gen_at(*t))
            .collect::<IsingResult<Vec<f64>>>()
            .map(nd::Array1::from)
    }
}

/// Fail if a field strength is non-finite.
pub(crate) fn check_field(h: f64) -> IsingResult<()> {
    if h.is_finite() {
        Ok(())
    } else {
        Err(IsingError::InvalidParameter(
            format!("field strength must be finite, got {}", h)))
    }
}

/// Relative tolerance on `|H[[i, j]] - H[[j, i]]|`, scaled by the largest
/// matrix element magnitude (or 1, whichever is greater).
pub const SYMMETRY_TOL: f64 = 1e-10;

/// Fail with `NumericInvariantViolation` unless `H` is square and symmetric to
/// within [`SYMMETRY_TOL`].
pub(crate) fn check_symmetric(H: &nd::Array2<f64>) -> IsingResult<()> {
    let (n, m) = H.dim();
    if n != m {
        return Err(IsingError::NumericInvariantViolation(
            format!("hamiltonian must be square, got {} x {}", n, m)));
    }
    let scale = H.iter().fold(1.0_f64, |acc, x| acc.max(x.abs()));
    let tol = SYMMETRY_TOL * scale;
    for i in 0..n {
        for j in 0..i {
            let dev = (H[[i, j]] - H[[j, i]]).abs();
            if !(dev <= tol) {
                return Err(IsingError::NumericInvariantViolation(
                    format!(
                        "hamiltonian is not symmetric: |H[{0},{1}] - H[{1},{0}]| = {2}",
                        i, j, dev,
                    )
                ));
            }
        }
    }
    Ok(())
}

/// Diagonalize a real symmetric Hamiltonian.
///
/// Eigenvalues are returned in ascending order, with eigenvectors in the
/// corresponding columns of the second array. Fails with
/// `NumericInvariantViolation` if `H` is not square and symmetric.
pub fn diagonalize(H: &nd::Array2<f64>)
    -> IsingResult<(nd::Array1<f64>, nd::Array2<f64>)>
{
    check_symmetric(H)?;
    Ok(H.eigh(UPLO::Lower)?)
}

/// Diagonalize a real symmetric Hamiltonian and return a ground state.
///
/// Note that, in general, there may be more than one state that minimizes the
/// energy of the system; this function offers no guarantees about which ground
/// state is returned.
pub fn ground_state(H: &nd::Array2<f64>) -> IsingResult<(f64, nd::Array1<f64>)> {
    let (E, V) = diagonalize(H)?;
    if E.is_empty() {
        return Err(IsingError::InvalidArgument(
            "hamiltonian has no states".into()));
    }
    let e: f64 = E[0];
    let v: nd::Array1<f64> = V.slice(s![.., 0]).to_owned();
    Ok((e, v))
}

/// Return the difference between the two lowest eigenvalues, if there are at
/// least two.
pub fn spectral_gap(E: &nd::Array1<f64>) -> Option<f64> {
    (E.len() >= 2).then(|| E[1] - E[0])
}
