//! Independent-task fan-out over parameter grids.

use std::sync::atomic::{ AtomicUsize, Ordering };
use ndarray as nd;
use rayon::iter::{ IntoParallelIterator, ParallelIterator };
use tracing::warn;
use tfim_sim::IsingResult;

/// Evaluate `f` on every element of `args` on the global rayon pool.
///
/// Results come back in the order of `args`. Each failure is kept at its own
/// index; other tasks run to completion regardless. Progress is printed to
/// stderr.
pub fn fan_out<P, T, F>(args: Vec<P>, f: F) -> Vec<IsingResult<T>>
where
    P: Send,
    T: Send,
    F: Fn(P) -> IsingResult<T> + Sync + Send,
{
    let len = args.len();
    let progress = AtomicUsize::new(0);
    eprint!("  {} / {} ", 0, len);
    let results: Vec<IsingResult<T>>
        = args.into_par_iter()
        .map(|p| {
            let output = f(p);
            let k = progress.fetch_add(1, Ordering::SeqCst) + 1;
            eprint!("\r  {} / {} ", k, len);
            output
        })
        .collect();
    eprintln!();
    results
}

/// Split per-sample results into a `(len, K)` array of values (NaN where
/// failed) and a success mask, logging each failure with a description of its
/// parameters.
pub fn unpack<P, D, const K: usize>(
    args: &[P],
    results: Vec<IsingResult<[f64; K]>>,
    describe: D,
) -> (nd::Array2<f64>, nd::Array1<u8>)
where D: Fn(&P) -> String
{
    let mut values: nd::Array2<f64>
        = nd::Array2::from_elem((results.len(), K), f64::NAN);
    let mut ok: nd::Array1<u8> = nd::Array1::zeros(results.len());
    let iter = args.iter().zip(results).zip(values.outer_iter_mut()).enumerate();
    for (k, ((p, res), mut row)) in iter {
        match res {
            Ok(x) => {
                row.assign(&nd::ArrayView1::from(&x[..]));
                ok[k] = 1;
            },
            Err(err) => {
                warn!(params = %describe(p), %err, "sample failed");
            },
        }
    }
    (values, ok)
}

/// Configure the global rayon pool; `threads == 0` keeps rayon's default.
pub fn init_pool(threads: usize) -> anyhow::Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    Ok(())
}
