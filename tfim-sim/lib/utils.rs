//! Output helpers.

pub use ndarray_npy;

/// Write a collection of arrays to a `.npz` archive.
///
/// Expands to an expression of type
/// [`IsingResult<()>`][crate::error::IsingResult]:
/// ```ignore
/// write_npz!(
///     outdir.join("scan.npz"),
///     arrays: {
///         "field" => &field,
///         "energy" => &energy,
///     }
/// )?;
/// ```
#[macro_export]
macro_rules! write_npz {
    (
        $filename:expr,
        arrays: { $( $key:expr => $arr:expr ),* $(,)? } $(,)?
    ) => {
        (|| -> $crate::error::IsingResult<()> {
            let file = ::std::fs::File::create($filename)?;
            let mut npz = $crate::utils::ndarray_npy::NpzWriter::new(file);
            $( npz.add_array($key, $arr)?; )*
            npz.finish()?;
            Ok(())
        })()
    }
}
