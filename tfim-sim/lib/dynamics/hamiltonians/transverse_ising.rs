//! An open linear spin chain with nearest-neighbor σ<sub>*z*</sub>σ<sub>*z*</sub>
//! coupling in a uniform transverse field.

use ndarray as nd;
use tracing::debug;
use crate::{
    dynamics::{ FieldParams, HBuild, check_field, diagonalize, ground_state },
    error::{ IsingError, IsingResult },
    hilbert::{ Basis, DEFAULT_MAX_BYTES, check_size, flip_index, num_states },
};

/// Hamiltonian builder for an `L`-site quantum transverse field Ising model
/// (QTFIM),
/// ```math
/// H = -\sum_{n=0}^{L-2} \sigma_n^z \sigma_{n+1}^z - h \sum_{n=0}^{L-1} \sigma_n^x
/// ```
/// with open boundaries and field strength `h`, which may depend on time.
///
/// The matrix is assembled directly in the bit-pattern basis of [`Basis`]:
/// the diagonal holds each configuration's bond energy, and `-h` is placed
/// between every pair of configurations differing by a single spin flip.
#[derive(Clone, Debug)]
pub struct HBuilderTransverseIsing {
    pub(crate) basis: Basis,
    pub(crate) field: FieldParams,
    pub(crate) max_bytes: usize,
}

impl HBuilderTransverseIsing {
    /// Create a new `HBuilderTransverseIsing`.
    pub fn new<F>(n_sites: usize, field: F) -> IsingResult<Self>
    where F: Into<FieldParams>
    {
        Self::new_with_limit(n_sites, field, DEFAULT_MAX_BYTES)
    }

    /// Create a new `HBuilderTransverseIsing`, failing if a dense Hamiltonian
    /// for `n_sites` sites would take more than `max_bytes`.
    pub fn new_with_limit<F>(n_sites: usize, field: F, max_bytes: usize)
        -> IsingResult<Self>
    where F: Into<FieldParams>
    {
        let field = field.into();
        let n = num_states(n_sites)?;
        if let FieldParams::Constant { h } = field { check_field(h)?; }
        let required
            = (n as u128).pow(2) * std::mem::size_of::<f64>() as u128;
        check_size("hamiltonian", required, max_bytes)?;
        let basis = Basis::new_with_limit(n_sites, max_bytes)?;
        Ok(Self { basis, field, max_bytes })
    }

    /// Return a reference to the basis.
    pub fn basis(&self) -> &Basis { &self.basis }

    /// Return the number of sites in the chain.
    pub fn n_sites(&self) -> usize { self.basis.n_sites() }

    /// Return the field parameterization.
    pub fn field(&self) -> &FieldParams { &self.field }

    /// Return all model parameters.
    pub fn params(&self) -> HTransverseIsingParams {
        HTransverseIsingParams {
            n_sites: self.n_sites(),
            field: self.field.clone(),
            max_bytes: self.max_bytes,
        }
    }

    /// Compute the Hamiltonian for a fixed field strength `h`.
    pub fn gen_with_field(&self, h: f64) -> IsingResult<nd::Array2<f64>> {
        check_field(h)?;
        let n = self.basis.len();
        let n_sites = self.basis.n_sites();
        let mut H: nd::Array2<f64> = nd::Array2::zeros((n, n));
        for (i, config) in self.basis.iter().enumerate() {
            H[[i, i]] = config.bond_energy();
            for site in 0..n_sites {
                let j = flip_index(i, site);
                H[[i, j]] = -h;
                H[[j, i]] = -h;
            }
        }
        debug!(n_sites, dim = n, h, "built hamiltonian");
        Ok(H)
    }

    /// Compute a time-independent Hamiltonian.
    ///
    /// Returns `None` if the field is time-dependent.
    pub fn gen_static(&self) -> Option<IsingResult<nd::Array2<f64>>> {
        match self.field {
            FieldParams::Constant { h } => Some(self.gen_with_field(h)),
            FieldParams::Variable { .. } => None,
        }
    }

    /// Compute the Hamiltonian at a given time.
    pub fn gen_at(&self, t: f64) -> IsingResult<nd::Array2<f64>> {
        let h = self.field.gen_at(t)?;
        self.gen_with_field(h)
    }

    /// Diagonalize the [time-independent representation][Self::gen_static] of
    /// the Hamiltonian.
    pub fn diagonalize(&self)
        -> IsingResult<(nd::Array1<f64>, nd::Array2<f64>)>
    {
        diagonalize(&self.static_or_err()?)
    }

    /// Diagonalize the [time-independent representation][Self::gen_static] of
    /// the Hamiltonian and return a ground state of the system.
    ///
    /// Note that, in general, there may be more than one state that minimizes
    /// the energy of the system; this method offers no guarantees about which
    /// ground state is returned.
    pub fn ground_state(&self) -> IsingResult<(f64, nd::Array1<f64>)> {
        ground_state(&self.static_or_err()?)
    }

    fn static_or_err(&self) -> IsingResult<nd::Array2<f64>> {
        self.gen_static()
            .unwrap_or_else(|| {
                Err(IsingError::InvalidArgument(
                    "time-dependent field has no static Hamiltonian".into()))
            })
    }
}

/// Initialization data for [`HBuilderTransverseIsing`].
#[derive(Clone, Debug)]
pub struct HTransverseIsingParams {
    pub n_sites: usize,
    pub field: FieldParams,
    pub max_bytes: usize,
}

impl HBuild for HBuilderTransverseIsing {
    type Params = HTransverseIsingParams;

    fn new_builder(params: Self::Params) -> IsingResult<Self> {
        let HTransverseIsingParams { n_sites, field, max_bytes } = params;
        Self::new_with_limit(n_sites, field, max_bytes)
    }

    fn build_static(&self) -> Option<IsingResult<nd::Array2<f64>>> {
        self.gen_static()
    }

    fn build_at(&self, t: f64) -> IsingResult<nd::Array2<f64>> {
        self.gen_at(t)
    }

    fn get_basis(&self) -> &Basis { self.basis() }
}

/// Build the Hamiltonian for an `n_sites`-site chain in a constant field `h`,
/// along with its basis.
pub fn build_hamiltonian(n_sites: usize, h: f64)
    -> IsingResult<(nd::Array2<f64>, Basis)>
{
    let builder = HBuilderTransverseIsing::new(n_sites, h)?;
    let H = builder.gen_with_field(h)?;
    Ok((H, builder.basis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::linalg::kron;

    // explicit tensor-product construction, for comparison only
    fn site_op(n_sites: usize, site: usize, a: &nd::Array2<f64>)
        -> nd::Array2<f64>
    {
        let left: nd::Array2<f64> = nd::Array2::eye(1 << (n_sites - site - 1));
        let right: nd::Array2<f64> = nd::Array2::eye(1 << site);
        kron(&kron(&left, a), &right)
    }

    fn kron_hamiltonian(n_sites: usize, h: f64) -> nd::Array2<f64> {
        let sz = nd::array![[1.0, 0.0], [0.0, -1.0]];
        let sx = nd::array![[0.0, 1.0], [1.0, 0.0]];
        let n = 1 << n_sites;
        let mut H: nd::Array2<f64> = nd::Array2::zeros((n, n));
        for k in 0..n_sites.saturating_sub(1) {
            H -= &site_op(n_sites, k, &sz).dot(&site_op(n_sites, k + 1, &sz));
        }
        for k in 0..n_sites {
            H -= &(site_op(n_sites, k, &sx) * h);
        }
        H
    }

    #[test]
    fn matches_tensor_product_construction() {
        for n_sites in 1..=5 {
            let (H, _) = build_hamiltonian(n_sites, 0.7).unwrap();
            let H_ref = kron_hamiltonian(n_sites, 0.7);
            assert!(H.iter().zip(H_ref.iter()).all(|(a, b)| (a - b).abs() < 1e-12));
        }
    }

    #[test]
    fn symmetric_with_single_flip_couplings() {
        let h = 1.3;
        for n_sites in 1..=7 {
            let (H, _) = build_hamiltonian(n_sites, h).unwrap();
            assert_eq!(H, H.t());
            for (i, row) in H.outer_iter().enumerate() {
                let offd: Vec<f64>
                    = row.iter().enumerate()
                    .filter(|(j, x)| *j != i && **x != 0.0)
                    .map(|(_, x)| *x)
                    .collect();
                assert_eq!(offd.len(), n_sites);
                assert!(offd.iter().all(|x| *x == -h));
                let bound = (n_sites - 1) as f64;
                assert!(H[[i, i]].abs() <= bound);
            }
        }
    }

    #[test]
    fn two_site_zero_field() {
        let (H, basis) = build_hamiltonian(2, 0.0).unwrap();
        assert_eq!(basis.len(), 4);
        assert_eq!(H.diag().to_vec(), vec![-1.0, 1.0, 1.0, -1.0]);
        let (E, _) = diagonalize(&H).unwrap();
        assert!((E[0] + 1.0).abs() < 1e-12);
        assert!((E[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn time_dependent_builder() {
        let builder
            = HBuilderTransverseIsing::new(3, FieldParams::new_variable(|t| t))
            .unwrap();
        assert!(builder.gen_static().is_none());
        assert!(matches!(builder.ground_state(), Err(IsingError::InvalidArgument(_))));
        let H = builder.gen_at(0.25).unwrap();
        let (H_ref, _) = build_hamiltonian(3, 0.25).unwrap();
        assert_eq!(H, H_ref);
        assert!(matches!(builder.gen_at(f64::INFINITY), Err(IsingError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(build_hamiltonian(0, 1.0), Err(IsingError::InvalidParameter(_))));
        assert!(matches!(build_hamiltonian(3, f64::NAN), Err(IsingError::InvalidParameter(_))));
        assert!(matches!(
            HBuilderTransverseIsing::new_with_limit(4, 1.0, 1024),
            Err(IsingError::ResourceExceeded { .. }),
        ));
        assert!(matches!(build_hamiltonian(20, 1.0), Err(IsingError::ResourceExceeded { .. })));
    }

    #[test]
    fn builder_from_params() {
        let builder = HBuilderTransverseIsing::new(4, 0.5).unwrap();
        let rebuilt = HBuilderTransverseIsing::new_builder(builder.params()).unwrap();
        assert_eq!(rebuilt.get_basis(), builder.basis());
        let H1 = builder.build_static().unwrap().unwrap();
        let H2 = rebuilt.build_at(10.0).unwrap();
        assert_eq!(H1, H2);
    }
}
