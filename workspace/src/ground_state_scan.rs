#![allow(non_snake_case)]

//! Ground-state energy, gap, and magnetization of the transverse-field Ising
//! chain over a grid of chain lengths and field strengths.

use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use ndarray::{ self as nd, s };
use tracing::info;
use tfim_sim::{
    write_npz,
    dynamics::{ HBuilderTransverseIsing, diagonalize, spectral_gap },
    observables::magnetization,
    IsingResult,
};
use lib::{ config::Config, sweep };

#[derive(Parser, Debug)]
#[command(about = "Scan TFIM ground states over chain length and field")]
struct Args {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "tfim.toml")]
    config: PathBuf,

    /// Override the number of worker threads.
    #[arg(short, long)]
    threads: Option<usize>,
}

fn do_point(hbuilder: &HBuilderTransverseIsing, h: f64) -> IsingResult<[f64; 3]> {
    let H = hbuilder.gen_with_field(h)?;
    let (E, V) = diagonalize(&H)?;
    let ground: nd::Array1<f64> = V.slice(s![.., 0]).to_owned();
    let m = magnetization(&ground, hbuilder.basis())?;
    let gap = spectral_gap(&E).unwrap_or(f64::NAN);
    Ok([E[0], gap, m])
}

fn main() -> anyhow::Result<()> {
    lib::init_logging();
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    sweep::init_pool(args.threads.unwrap_or(config.parallel.threads))?;

    let outdir = config.output.outdir.clone();
    std::fs::create_dir_all(&outdir)
        .with_context(|| format!("couldn't create {}", outdir.display()))?;

    let sites = &config.ground_state.sites;
    let field: nd::Array1<f64> = config.ground_state.field.points();

    let max_bytes = config.limits.max_bytes;
    // one basis per chain length, shared by every field value
    let builders: Vec<Option<HBuilderTransverseIsing>>
        = sites.iter()
        .map(|&n| HBuilderTransverseIsing::new_with_limit(n, 0.0, max_bytes).ok())
        .collect();

    let params: Vec<(usize, f64)>
        = (0..sites.len()).cartesian_product(field.iter().copied())
        .collect();
    info!(
        chains = sites.len(),
        fields = field.len(),
        samples = params.len(),
        "starting ground-state scan"
    );
    let results
        = sweep::fan_out(params.clone(), |(k, h)| {
            match &builders[k] {
                Some(hbuilder) => do_point(hbuilder, h),
                // reproduces the construction error for this sample
                None => {
                    HBuilderTransverseIsing::new_with_limit(sites[k], h, max_bytes)
                        .and_then(|hbuilder| do_point(&hbuilder, h))
                },
            }
        });
    let (values, ok) = sweep::unpack(
        &params,
        results,
        |(k, h)| format!("L = {}, h = {}", sites[*k], h),
    );
    let failed = ok.iter().filter(|x| **x == 0).count();
    if failed > 0 {
        info!(failed, "some samples failed; stored as NaN");
    }

    let shape = (sites.len(), field.len());
    let energy: nd::Array2<f64>
        = values.column(0).to_owned().into_shape(shape)?;
    let gap: nd::Array2<f64>
        = values.column(1).to_owned().into_shape(shape)?;
    let mag: nd::Array2<f64>
        = values.column(2).to_owned().into_shape(shape)?;
    let ok: nd::Array2<u8> = ok.into_shape(shape)?;
    let sites: nd::Array1<u64> = sites.iter().map(|&n| n as u64).collect();

    let outfile = outdir.join("ground_state_scan.npz");
    write_npz!(
        &outfile,
        arrays: {
            "sites" => &sites,
            "field" => &field,
            "energy" => &energy,
            "gap" => &gap,
            "magnetization" => &mag,
            "ok" => &ok,
        }
    )?;
    info!(path = %outfile.display(), "done");
    Ok(())
}
