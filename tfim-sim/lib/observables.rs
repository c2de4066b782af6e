//! Magnetization observables over state vectors in the computational basis.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ IsingError, IsingResult },
    hilbert::Basis,
};

/// Tolerance on state normalization and on the per-configuration bound.
pub const NORM_TOL: f64 = 1e-8;

/// Probability weight of a single state amplitude.
pub trait Probability {
    fn prob(&self) -> f64;
}

impl Probability for f64 {
    fn prob(&self) -> f64 { self * self }
}

impl Probability for C64 {
    fn prob(&self) -> f64 { self.norm_sqr() }
}

fn check_state<'a, A, I>(state: I, len: usize, basis: &Basis) -> IsingResult<()>
where
    A: Probability + 'a,
    I: IntoIterator<Item = &'a A>,
{
    if len != basis.len() {
        return Err(IsingError::InvalidArgument(
            format!("state has length {}, basis has {}", len, basis.len())));
    }
    let total: f64 = state.into_iter().map(Probability::prob).sum();
    // NaN must fail here too
    if !((total - 1.0).abs() <= NORM_TOL) {
        return Err(IsingError::InvalidArgument(
            format!("state is not normalized: total probability {}", total)));
    }
    Ok(())
}

/// Compute the chain magnetization of a normalized state.
///
/// For each configuration `i` with probability `p_i`, the per-configuration
/// value is `m_i = p_i * (1/L) * Σ_k σ^z_k`, and the result is `Σ_i |m_i|`.
/// This is *not* the expectation value of the magnetization operator (see
/// [`mean_sz`]): contributions from configurations of opposite sign do not
/// cancel, so a symmetric superposition of the two aligned states still gives
/// 1. The result lies in `[0, 1]`.
///
/// Fails with `InvalidArgument` if the state does not match the basis or is
/// not normalized, and with `NumericInvariantViolation` if any `|m_i| > 1`.
pub fn magnetization<A>(state: &nd::Array1<A>, basis: &Basis)
    -> IsingResult<f64>
where A: Probability
{
    check_state(state.iter(), state.len(), basis)?;
    let n_sites = basis.n_sites() as f64;
    let mut acc: f64 = 0.0;
    for (i, (amp, config)) in state.iter().zip(basis.iter()).enumerate() {
        let p = amp.prob();
        let m: f64 = config.sz().map(|sz| p * sz).sum::<f64>() / n_sites;
        if !(m.abs() <= 1.0 + NORM_TOL) {
            return Err(IsingError::NumericInvariantViolation(
                format!("magnetization {} of configuration {} exceeds 1", m, i)));
        }
        acc += m.abs();
    }
    Ok(acc)
}

/// Compute the expectation value `⟨(1/L) Σ_k σ^z_k⟩` of a normalized state.
///
/// The result lies in `[-1, 1]`.
pub fn mean_sz<A>(state: &nd::Array1<A>, basis: &Basis) -> IsingResult<f64>
where A: Probability
{
    check_state(state.iter(), state.len(), basis)?;
    let n_sites = basis.n_sites() as f64;
    Ok(
        state.iter().zip(basis.iter())
            .map(|(amp, config)| amp.prob() * config.sz().sum::<f64>())
            .sum::<f64>()
        / n_sites
    )
}

/// Compute [`magnetization`] for every column of `psi`, where the last axis
/// indexes time.
pub fn magnetization_series(psi: &nd::Array2<C64>, basis: &Basis)
    -> IsingResult<nd::Array1<f64>>
{
    psi.axis_iter(nd::Axis(1))
        .map(|psik| magnetization(&psik.to_owned(), basis))
        .collect::<IsingResult<Vec<f64>>>()
        .map(nd::Array1::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hilbert::generate_basis;

    #[test]
    fn aligned_states() {
        let basis = generate_basis(3).unwrap();
        let up = basis.get_vector_index(0).unwrap();
        let dn = basis.get_vector_index(7).unwrap();
        assert!((magnetization(&up, &basis).unwrap() - 1.0).abs() < 1e-12);
        assert!((magnetization(&dn, &basis).unwrap() - 1.0).abs() < 1e-12);
        assert!((mean_sz(&up, &basis).unwrap() - 1.0).abs() < 1e-12);
        assert!((mean_sz(&dn, &basis).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn cat_state_differs_from_expectation() {
        let basis = generate_basis(2).unwrap();
        let a = 0.5_f64.sqrt();
        let cat = nd::array![a, 0.0, 0.0, a];
        assert!((magnetization(&cat, &basis).unwrap() - 1.0).abs() < 1e-12);
        assert!(mean_sz(&cat, &basis).unwrap().abs() < 1e-12);
    }

    #[test]
    fn uniform_superposition() {
        let basis = generate_basis(2).unwrap();
        let state = nd::Array1::from_elem(4, 0.5);
        // m = [1/4, 0, 0, -1/4]
        assert!((magnetization(&state, &basis).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_states() {
        let basis = generate_basis(2).unwrap();
        let short = nd::array![1.0, 0.0];
        assert!(matches!(magnetization(&short, &basis), Err(IsingError::InvalidArgument(_))));
        let unnormalized = nd::array![1.0, 1.0, 0.0, 0.0];
        assert!(matches!(magnetization(&unnormalized, &basis), Err(IsingError::InvalidArgument(_))));
        let nan = nd::array![f64::NAN, 0.0, 0.0, 0.0];
        assert!(matches!(magnetization(&nan, &basis), Err(IsingError::InvalidArgument(_))));
    }

    #[test]
    fn series_over_time_axis() {
        let basis = generate_basis(1).unwrap();
        let mut psi: nd::Array2<C64> = nd::Array2::zeros((2, 2));
        psi[[0, 0]] = C64::from(1.0);
        psi[[0, 1]] = C64::from(0.5_f64.sqrt());
        psi[[1, 1]] = C64::new(0.0, 0.5_f64.sqrt());
        let m = magnetization_series(&psi, &basis).unwrap();
        assert!((m[0] - 1.0).abs() < 1e-12);
        assert!((m[1] - 1.0).abs() < 1e-12);
    }
}
