//! Hamiltonian builders.

use ndarray as nd;
use crate::{ error::IsingResult, hilbert::Basis };

pub mod transverse_ising;
pub use transverse_ising::{
    HBuilderTransverseIsing,
    HTransverseIsingParams,
    build_hamiltonian,
};

/// Basic requirements for any Hamiltonian builder.
pub trait HBuild {
    /// Initialization data type.
    type Params;

    /// Initialize `self`.
    fn new_builder(params: Self::Params) -> IsingResult<Self>
    where Self: Sized;

    /// Build a time-independent Hamiltonian matrix, if possible.
    fn build_static(&self) -> Option<IsingResult<nd::Array2<f64>>>;

    /// Build the Hamiltonian matrix at a given time.
    fn build_at(&self, t: f64) -> IsingResult<nd::Array2<f64>>;

    /// Return a reference to the basis.
    fn get_basis(&self) -> &Basis;
}
