//! MAT to HDF5 conversion: read, flatten, write.

use super::flatten::{flatten_record, Diagnostic};
use super::mat::read_mat_file;
use super::writer::write_record;
use crate::error::{H5LensError, Result};
use std::path::Path;

/// Outcome of a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Top-level names written to the output, sorted.
    pub variables: Vec<String>,
    /// Values that could not be converted.
    pub skipped: Vec<Diagnostic>,
}

impl ConversionReport {
    /// Whether every value was converted.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Convert the MAT file at `mat_path` into a new HDF5 file at `h5_path`.
///
/// The output is created or truncated. Errors raised after it was created
/// are wrapped in [`H5LensError::Conversion`]; the output may then be
/// incomplete.
pub fn convert(mat_path: &Path, h5_path: &Path) -> Result<ConversionReport> {
    let contents = read_mat_file(mat_path)?;
    let flattened = flatten_record(contents);

    let write = || -> Result<()> {
        let file = hdf5::File::create(h5_path)?;
        write_record(&file, &flattened.record)?;
        file.close()?;
        Ok(())
    };
    write().map_err(|e| H5LensError::conversion(h5_path.to_path_buf(), e))?;

    let report = ConversionReport {
        variables: flattened.record.keys().cloned().collect(),
        skipped: flattened.diagnostics,
    };
    tracing::info!(
        from = %mat_path.display(),
        to = %h5_path.display(),
        written = report.variables.len(),
        skipped = report.skipped.len(),
        "converted MAT file"
    );
    Ok(report)
}
