//! Sweep configuration, loaded from a TOML file.
//!
//! Every field has a default, so an empty file (or no file) gives a usable
//! configuration:
//! ```toml
//! [ground_state]
//! sites = [2, 4, 6, 8]
//! field = { start = 0.0, stop = 2.0, num = 41 }
//!
//! [quench]
//! sites = 8
//! h0 = 0.2
//! profile = { kind = "ramp", h_start = 0.2, h_stop = 1.5, duration = 5.0 }
//! time = { start = 0.0, stop = 5.0, num = 101 }
//!
//! [parallel]
//! threads = 0
//!
//! [limits]
//! max_bytes = 1073741824
//!
//! [output]
//! outdir = "output"
//! ```

use std::path::{ Path, PathBuf };
use anyhow::Context;
use ndarray as nd;
use serde::Deserialize;
use tfim_sim::{ dynamics::FieldParams, hilbert::DEFAULT_MAX_BYTES };

/// Evenly spaced samples `start..=stop`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct Grid {
    pub start: f64,
    pub stop: f64,
    pub num: usize,
}

impl Grid {
    /// Generate the grid points.
    pub fn points(&self) -> nd::Array1<f64> {
        nd::Array1::linspace(self.start, self.stop, self.num)
    }
}

/// Time dependence of the transverse field after a quench.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldProfile {
    /// `h(t) = h`.
    Constant { h: f64 },
    /// Linear ramp from `h_start` to `h_stop` over `duration`, constant after.
    Ramp { h_start: f64, h_stop: f64, duration: f64 },
    /// `h(t) = h_mean + amplitude * sin(frequency * t)`.
    Oscillating { h_mean: f64, amplitude: f64, frequency: f64 },
}

impl FieldProfile {
    /// Convert to a field parameterization for the Hamiltonian builder.
    pub fn to_field(self) -> FieldParams {
        match self {
            Self::Constant { h } => FieldParams::new_constant(h),
            Self::Ramp { h_start, h_stop, duration } => {
                FieldParams::new_variable(move |t| {
                    let frac = (t / duration).clamp(0.0, 1.0);
                    h_start + (h_stop - h_start) * frac
                })
            },
            Self::Oscillating { h_mean, amplitude, frequency } => {
                FieldParams::new_variable(move |t| {
                    h_mean + amplitude * (frequency * t).sin()
                })
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroundStateConfig {
    /// Chain lengths to scan.
    pub sites: Vec<usize>,
    /// Field strengths to scan for every chain length.
    pub field: Grid,
}

impl Default for GroundStateConfig {
    fn default() -> Self {
        Self {
            sites: vec![2, 4, 6, 8],
            field: Grid { start: 0.0, stop: 2.0, num: 41 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct QuenchConfig {
    /// Chain length.
    pub sites: usize,
    /// Field strength whose ground state is the initial state.
    pub h0: f64,
    /// Field after the quench.
    pub profile: FieldProfile,
    /// Sample times.
    pub time: Grid,
}

impl Default for QuenchConfig {
    fn default() -> Self {
        Self {
            sites: 8,
            h0: 0.2,
            profile: FieldProfile::Ramp { h_start: 0.2, h_stop: 1.5, duration: 5.0 },
            time: Grid { start: 0.0, stop: 5.0, num: 101 },
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Number of rayon worker threads; 0 leaves the choice to rayon.
    pub threads: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Upper bound on the size of any single basis or Hamiltonian.
    pub max_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self { Self { max_bytes: DEFAULT_MAX_BYTES } }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub outdir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self { Self { outdir: PathBuf::from("output") } }
}

/// Top-level configuration for all sweep binaries.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ground_state: GroundStateConfig,
    pub quench: QuenchConfig,
    pub parallel: ParallelConfig,
    pub limits: LimitsConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Parse a configuration from a TOML string.
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid configuration")
    }

    /// Load a configuration file, falling back to defaults if it does not
    /// exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("couldn't read {}", path.display()))?;
        Self::from_toml(&s)
            .with_context(|| format!("couldn't load {}", path.display()))
    }
}
