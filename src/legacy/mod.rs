//! Conversion of MATLAB Level-5 MAT files to HDF5.

mod convert;
pub mod flatten;
pub mod mat;
mod value;
mod writer;

pub use convert::{convert, ConversionReport};
pub use flatten::{flatten, flatten_record, Diagnostic, Flattened, PlainValue, Record};
pub use mat::{parse_mat, read_mat_file, MatContents};
pub use value::{CellArray, LegacyValue, NumericArray, StructArray};
pub use writer::write_record;
