//! Evolution functions for the Schrödinger equation over independent time
//! samples.
//!
//! Each sample `t` evolves the same initial state under the Hamiltonian built
//! at that time, `psi(t) = exp(-i t H(t)) psi0`; samples are never chained.

use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use tracing::warn;
use super::*;
use crate::dynamics::HBuild;

fn sample<H>(psi0: &nd::Array1<C64>, hbuilder: &H, t: f64)
    -> IsingResult<nd::Array1<C64>>
where H: HBuild
{
    let result
        = hbuilder.build_at(t)
        .and_then(|h| propagate(psi0, &h, t));
    if let Err(err) = &result {
        warn!(t, %err, "time sample failed");
    }
    result
}

fn check_len<H>(psi0: &nd::Array1<C64>, hbuilder: &H) -> IsingResult<()>
where H: HBuild
{
    let n = hbuilder.get_basis().len();
    if psi0.len() != n {
        return Err(IsingError::InvalidArgument(
            format!("state has length {}, basis has {}", psi0.len(), n)));
    }
    Ok(())
}

/// Compute the evolved state at every time in `t`, one result per sample in
/// the same order.
///
/// A failed sample is reported at its index and does not affect the others.
pub fn time_series<H>(
    psi0: &nd::Array1<C64>,
    hbuilder: &H,
    t: &nd::Array1<f64>,
) -> Vec<IsingResult<nd::Array1<C64>>>
where H: HBuild
{
    t.iter()
        .map(|tk| sample(psi0, hbuilder, *tk))
        .collect()
}

/// Parallel counterpart to [`time_series`], with identical output.
///
/// Each sample rebuilds its own Hamiltonian on a rayon worker thread; only the
/// builder, the initial state, and the sample time are shared.
pub fn time_series_par<H>(
    psi0: &nd::Array1<C64>,
    hbuilder: &H,
    t: &nd::Array1<f64>,
) -> Vec<IsingResult<nd::Array1<C64>>>
where H: HBuild + Sync
{
    t.to_vec()
        .into_par_iter()
        .map(|tk| sample(psi0, hbuilder, tk))
        .collect()
}

fn collect_series(
    n: usize,
    series: Vec<IsingResult<nd::Array1<C64>>>,
) -> IsingResult<nd::Array2<C64>>
{
    let mut psi: nd::Array2<C64> = nd::Array::zeros((n, series.len()));
    let iter = series.into_iter().zip(psi.axis_iter_mut(nd::Axis(1)));
    for (psik, mut target) in iter {
        target.assign(&psik?);
    }
    Ok(psi)
}

/// Compute the evolution of `psi0` as a 2D array with time along the last
/// axis, failing on the first failed sample.
pub fn evolve_t<H>(
    psi0: &nd::Array1<C64>,
    hbuilder: &H,
    t: &nd::Array1<f64>,
) -> IsingResult<nd::Array2<C64>>
where H: HBuild
{
    check_len(psi0, hbuilder)?;
    collect_series(psi0.len(), time_series(psi0, hbuilder, t))
}

/// Parallel counterpart to [`evolve_t`].
pub fn evolve_t_par<H>(
    psi0: &nd::Array1<C64>,
    hbuilder: &H,
    t: &nd::Array1<f64>,
) -> IsingResult<nd::Array2<C64>>
where H: HBuild + Sync
{
    check_len(psi0, hbuilder)?;
    collect_series(psi0.len(), time_series_par(psi0, hbuilder, t))
}

/// Compute the evolution of an initial state description, as in
/// [`evolve_t_par`].
///
/// Fails if the initial state description is invalid.
pub fn evolve_t_with<P, H>(
    psi0: P,
    hbuilder: &H,
    t: &nd::Array1<f64>,
) -> IsingResult<nd::Array2<C64>>
where
    P: Into<Pure>,
    H: HBuild + Sync,
{
    let psi0
        = psi0.into().into_array(hbuilder.get_basis())
        .ok_or_else(|| {
            IsingError::InvalidArgument("invalid initial state".into())
        })?;
    evolve_t_par(&psi0, hbuilder, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{ FieldParams, HBuilderTransverseIsing };

    fn ramp_builder(n_sites: usize) -> HBuilderTransverseIsing {
        HBuilderTransverseIsing::new(
            n_sites,
            FieldParams::new_variable(|t| 0.2 + 0.5 * t),
        )
        .unwrap()
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let hbuilder = ramp_builder(4);
        let psi0 = hbuilder.basis().get_vector_index(0).unwrap();
        let time = nd::Array1::linspace(0.0, 3.0, 17);
        let seq = time_series(&psi0, &hbuilder, &time);
        let par = time_series_par(&psi0, &hbuilder, &time);
        assert_eq!(seq.len(), par.len());
        for (a, b) in seq.iter().zip(par.iter()) {
            let a = a.as_ref().unwrap();
            let b = b.as_ref().unwrap();
            assert!(a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-12));
        }
    }

    #[test]
    fn samples_are_independent() {
        let hbuilder = ramp_builder(3);
        let psi0 = hbuilder.basis().get_vector_index(5).unwrap();
        let time = nd::array![0.4, 1.0, 2.5];
        let series = time_series(&psi0, &hbuilder, &time);
        for (tk, psik) in time.iter().zip(series) {
            let H = hbuilder.gen_at(*tk).unwrap();
            let expected = propagate(&psi0, &H, *tk).unwrap();
            let psik = psik.unwrap();
            assert!(psik.iter().zip(expected.iter()).all(|(x, y)| (x - y).norm() < 1e-12));
            assert!((psik.norm() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn failures_are_isolated() {
        let hbuilder
            = HBuilderTransverseIsing::new(
                2, FieldParams::new_variable(|t| 1.0 / (t - 1.0)))
            .unwrap();
        let psi0 = hbuilder.basis().get_vector_index(0).unwrap();
        let time = nd::array![0.0, 1.0, 2.0];
        let series = time_series_par(&psi0, &hbuilder, &time);
        assert!(series[0].is_ok());
        assert!(matches!(series[1], Err(IsingError::InvalidParameter(_))));
        assert!(series[2].is_ok());
        assert!(evolve_t(&psi0, &hbuilder, &time).is_err());
    }

    #[test]
    fn evolve_into_array() {
        let hbuilder = HBuilderTransverseIsing::new(3, 1.0).unwrap();
        let time = nd::Array1::linspace(0.0, 1.0, 5);
        let init = hbuilder.basis().config_of(0).unwrap().clone();
        let psi = evolve_t_with(init, &hbuilder, &time).unwrap();
        assert_eq!(psi.dim(), (8, 5));
        assert!((psi[[0, 0]] - C64::from(1.0)).norm() < 1e-12);
        let bad: nd::Array1<C64> = nd::Array1::zeros(4);
        assert!(matches!(
            evolve_t(&bad, &hbuilder, &time),
            Err(IsingError::InvalidArgument(_)),
        ));
    }
}
