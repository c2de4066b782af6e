//! Definitions to describe spin states, chain configurations, and the
//! computational basis they span.
//!
//! A chain of `L` sites has `2^L` configurations. Configuration `i` is the bit
//! pattern of `i`: site `k` (zero-indexed) is [`HSpin::Dn`] if and only if bit
//! `k` of `i` is set. All conversions between indices and configurations are
//! closed-form, so the basis is never searched.

use std::ops::Deref;
use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::{ Zero, One };
use tracing::debug;
use crate::error::{ IsingError, IsingResult };

/// Default upper bound, in bytes, on any single basis or matrix allocation.
pub const DEFAULT_MAX_BYTES: usize = 1 << 30;

/* States *********************************************************************/

/// Simple representation of a spin-1/2 site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HSpin {
    /// Spin-up state, bit value 0.
    Up,
    /// Spin-down state, bit value 1.
    Dn,
}

impl HSpin {
    /// Return the `σ_z` eigenvalue: `+1` for up, `-1` for down.
    pub fn sz(&self) -> f64 {
        match *self {
            Self::Up =>  1.0,
            Self::Dn => -1.0,
        }
    }

    /// Return the bit encoding of the spin.
    pub fn bit(&self) -> bool { matches!(*self, Self::Dn) }

    /// Return the opposite spin.
    pub fn flipped(&self) -> Self {
        match *self {
            Self::Up => Self::Dn,
            Self::Dn => Self::Up,
        }
    }
}

impl From<bool> for HSpin {
    fn from(bit: bool) -> Self { if bit { Self::Dn } else { Self::Up } }
}

/// Check that a chain length is usable as a basis size and return the number
/// of basis states, `2^n_sites`.
pub(crate) fn num_states(n_sites: usize) -> IsingResult<usize> {
    if n_sites == 0 {
        return Err(IsingError::InvalidParameter(
            "chain length must be positive".into()));
    }
    if n_sites >= usize::BITS as usize {
        return Err(IsingError::InvalidParameter(
            format!("chain length {} overflows the basis index", n_sites)));
    }
    Ok(1_usize << n_sites)
}

/// Fail with `ResourceExceeded` if `required` bytes would exceed `limit`.
pub(crate) fn check_size(what: &'static str, required: u128, limit: usize)
    -> IsingResult<()>
{
    if required > limit as u128 {
        Err(IsingError::ResourceExceeded { what, required, limit })
    } else {
        Ok(())
    }
}

/// Return the index of the configuration obtained from configuration `index`
/// by flipping `site`.
///
/// Equal to `SpinConfig::from_index(L, index)?.flipped(site).index()`. `site`
/// must be less than the chain length, which is itself below `usize::BITS`.
#[inline]
pub(crate) fn flip_index(index: usize, site: usize) -> usize { index ^ (1 << site) }

/// A fixed-length configuration of spins along the chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpinConfig(Vec<HSpin>);

impl Deref for SpinConfig {
    type Target = [HSpin];

    fn deref(&self) -> &Self::Target { &self.0 }
}

impl From<Vec<HSpin>> for SpinConfig {
    fn from(spins: Vec<HSpin>) -> Self { Self(spins) }
}

impl FromIterator<HSpin> for SpinConfig {
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = HSpin>
    {
        Self(iter.into_iter().collect())
    }
}

impl SpinConfig {
    /// Expand a basis index into its configuration on `n_sites` sites.
    pub fn from_index(n_sites: usize, index: usize) -> IsingResult<Self> {
        let n = num_states(n_sites)?;
        if index >= n {
            return Err(IsingError::InvalidParameter(
                format!("index {} out of range for {} sites", index, n_sites)));
        }
        Ok(Self::from_index_unchecked(n_sites, index))
    }

    fn from_index_unchecked(n_sites: usize, index: usize) -> Self {
        (0..n_sites).map(|k| HSpin::from((index >> k) & 1 == 1)).collect()
    }

    /// Return the basis index of `self`.
    pub fn index(&self) -> usize {
        self.0.iter().enumerate()
            .map(|(k, s)| (s.bit() as usize) << k)
            .sum()
    }

    /// Return the number of sites.
    pub fn n_sites(&self) -> usize { self.0.len() }

    /// Return a copy of `self` with the spin at `site` flipped.
    ///
    /// *Panics* if `site` is out of range.
    pub fn flipped(&self, site: usize) -> Self {
        let mut spins = self.0.clone();
        spins[site] = spins[site].flipped();
        Self(spins)
    }

    /// Nearest-neighbor Ising energy with open boundaries: each bond
    /// contributes `-1` for aligned spins and `+1` otherwise.
    pub fn bond_energy(&self) -> f64 {
        self.0.iter()
            .tuple_windows()
            .map(|(sk, skp1)| if sk == skp1 { -1.0 } else { 1.0 })
            .sum()
    }

    /// Return the `σ_z` eigenvalue of every site.
    pub fn sz(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(HSpin::sz)
    }
}

/* Bases **********************************************************************/

/// All `2^L` configurations of an `L`-site chain, ordered by index.
///
/// The basis depends only on `L` and may be shared by every Hamiltonian built
/// for a chain of that length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Basis {
    n_sites: usize,
    states: Vec<SpinConfig>,
}

impl Deref for Basis {
    type Target = [SpinConfig];

    fn deref(&self) -> &Self::Target { &self.states }
}

impl Basis {
    /// Generate the basis for `n_sites` sites.
    pub fn new(n_sites: usize) -> IsingResult<Self> {
        Self::new_with_limit(n_sites, DEFAULT_MAX_BYTES)
    }

    /// Generate the basis for `n_sites` sites, failing if its storage would
    /// exceed `max_bytes`.
    pub fn new_with_limit(n_sites: usize, max_bytes: usize)
        -> IsingResult<Self>
    {
        let n = num_states(n_sites)?;
        let per_state = std::mem::size_of::<SpinConfig>()
            + n_sites * std::mem::size_of::<HSpin>();
        check_size("basis", n as u128 * per_state as u128, max_bytes)?;
        let states: Vec<SpinConfig>
            = (0..n)
            .map(|i| SpinConfig::from_index_unchecked(n_sites, i))
            .collect();
        debug!(n_sites, num_states = n, "generated basis");
        Ok(Self { n_sites, states })
    }

    /// Return the number of sites in each configuration.
    pub fn n_sites(&self) -> usize { self.n_sites }

    /// Get the configuration at `index`.
    pub fn config_of(&self, index: usize) -> Option<&SpinConfig> {
        self.states.get(index)
    }

    /// Get the index of a configuration.
    pub fn index_of(&self, config: &SpinConfig) -> IsingResult<usize> {
        if config.n_sites() != self.n_sites {
            return Err(IsingError::InvalidArgument(
                format!(
                    "configuration has {} sites, basis has {}",
                    config.n_sites(), self.n_sites,
                )
            ));
        }
        Ok(config.index())
    }

    /// Get an array representation of a particular basis state.
    pub fn get_vector(&self, config: &SpinConfig) -> Option<nd::Array1<C64>> {
        self.index_of(config).ok()
            .and_then(|k| self.get_vector_index(k))
    }

    /// Get an array representation of a particular basis state by index.
    pub fn get_vector_index(&self, index: usize) -> Option<nd::Array1<C64>> {
        let n = self.states.len();
        (index < n).then(|| {
            (0..n).map(|j| if j == index { C64::one() } else { C64::zero() })
                .collect()
        })
    }

    /// Get an array representation of a linear combination of basis states,
    /// with weights determined by a weighting function.
    ///
    /// The weighting function is passed a configuration and its index. The
    /// result is not normalized.
    pub fn get_vector_weighted<F>(&self, weights: F) -> nd::Array1<C64>
    where F: Fn(&SpinConfig, usize) -> C64
    {
        self.states.iter().enumerate()
            .map(|(index, config)| weights(config, index))
            .collect()
    }
}

/// Generate the basis for a chain of `n_sites` sites.
pub fn generate_basis(n_sites: usize) -> IsingResult<Basis> {
    Basis::new(n_sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet as HashSet;

    #[test]
    fn index_round_trip() {
        for n_sites in 1..=12 {
            for i in 0..(1_usize << n_sites) {
                let config = SpinConfig::from_index(n_sites, i).unwrap();
                assert_eq!(config.n_sites(), n_sites);
                assert_eq!(config.index(), i);
            }
        }
    }

    #[test]
    fn config_bits() {
        let config = SpinConfig::from_index(4, 0b0110).unwrap();
        assert_eq!(
            &*config,
            &[HSpin::Up, HSpin::Dn, HSpin::Dn, HSpin::Up],
        );
    }

    #[test]
    fn basis_complete_and_unique() {
        for n_sites in 1..=10 {
            let basis = generate_basis(n_sites).unwrap();
            assert_eq!(basis.len(), 1 << n_sites);
            let unique: HashSet<&SpinConfig> = basis.iter().collect();
            assert_eq!(unique.len(), basis.len());
            for (i, config) in basis.iter().enumerate() {
                assert_eq!(basis.index_of(config).unwrap(), i);
                assert_eq!(basis.config_of(i), Some(config));
            }
        }
    }

    #[test]
    fn flip_index_matches_flipped_config() {
        let basis = generate_basis(5).unwrap();
        for (i, config) in basis.iter().enumerate() {
            for site in 0..5 {
                assert_eq!(flip_index(i, site), config.flipped(site).index());
            }
        }
    }

    #[test]
    fn bond_energies() {
        let aligned = SpinConfig::from_index(4, 0b0000).unwrap();
        let neel = SpinConfig::from_index(4, 0b0101).unwrap();
        let single = SpinConfig::from_index(1, 1).unwrap();
        assert_eq!(aligned.bond_energy(), -3.0);
        assert_eq!(neel.bond_energy(), 3.0);
        assert_eq!(single.bond_energy(), 0.0);
    }

    #[test]
    fn invalid_sizes() {
        assert!(matches!(Basis::new(0), Err(IsingError::InvalidParameter(_))));
        assert!(matches!(
            Basis::new(usize::BITS as usize),
            Err(IsingError::InvalidParameter(_)),
        ));
        assert!(matches!(
            Basis::new(40),
            Err(IsingError::ResourceExceeded { .. }),
        ));
        assert!(matches!(
            SpinConfig::from_index(3, 8),
            Err(IsingError::InvalidParameter(_)),
        ));
    }

    #[test]
    fn index_of_wrong_length() {
        let basis = generate_basis(3).unwrap();
        let config = SpinConfig::from_index(4, 0).unwrap();
        assert!(matches!(
            basis.index_of(&config),
            Err(IsingError::InvalidArgument(_)),
        ));
    }

    #[test]
    fn basis_vectors() {
        let basis = generate_basis(2).unwrap();
        let v = basis.get_vector_index(2).unwrap();
        assert_eq!(v[2], C64::one());
        assert_eq!(v.iter().filter(|a| a.is_zero()).count(), 3);
        assert!(basis.get_vector_index(4).is_none());
        let config = SpinConfig::from(vec![HSpin::Dn, HSpin::Dn]);
        assert_eq!(basis.get_vector(&config).unwrap()[3], C64::one());
        let w = basis.get_vector_weighted(|config, _| {
            C64::from(config.sz().sum::<f64>())
        });
        assert_eq!(w, nd::array![2.0, 0.0, 0.0, -2.0].mapv(C64::from));
    }
}
