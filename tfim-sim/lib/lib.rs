#![allow(non_snake_case)]

//! Exact-diagonalization tools for the one-dimensional transverse-field Ising
//! chain: computational basis, Hamiltonian assembly, ground states,
//! magnetization, and unitary time evolution.

pub mod error;
pub mod utils;
pub mod hilbert;
pub mod dynamics;
pub mod observables;
pub mod evolution;

pub use error::{ IsingError, IsingResult };
pub use hilbert::{ Basis, HSpin, SpinConfig, generate_basis };
pub use dynamics::{ FieldParams, build_hamiltonian, diagonalize, ground_state };
pub use observables::magnetization;
pub use evolution::{
    propagate,
    propagator,
    schrodinger::{ time_series, time_series_par },
};
