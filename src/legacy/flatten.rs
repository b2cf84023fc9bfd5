//! Reduce decoded MAT values to what an HDF5 file can hold.
//!
//! Only numeric arrays, text and nested maps survive. Struct arrays with
//! more than one element cannot be expressed and are dropped with a
//! diagnostic; every other dropped value vanishes silently.

use super::value::{CellArray, LegacyValue, NumericArray, StructArray};
use ndarray::{Array2, ArrayD, IxDyn};
use std::collections::BTreeMap;
use std::fmt;

/// Message recorded for struct arrays with more than one element.
pub const STRUCT_ARRAY_MESSAGE: &str = "Cannot convert structure of arrays to HDF5";

/// A map of names to flattened values.
pub type Record = BTreeMap<String, PlainValue>;

/// A value the HDF5 writer can store directly.
#[derive(Debug, Clone, PartialEq)]
pub enum PlainValue {
    /// Numeric array, element type preserved.
    Numeric(NumericArray),
    /// Single string.
    Text(String),
    /// One string per row.
    TextRows(Vec<String>),
    /// Nested record, written as a group.
    Map(Record),
}

/// A value that was dropped, with the path it had in the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Slash-joined path, rooted at the variable name.
    pub path: String,
    /// What went wrong.
    pub message: String,
}

impl Diagnostic {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WARNING: {}: '{}'", self.message, self.path)
    }
}

/// Result of flattening a whole file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Flattened {
    /// Values that survived.
    pub record: Record,
    /// Values that were dropped with a reason.
    pub diagnostics: Vec<Diagnostic>,
}

/// Flatten every top-level variable of a decoded file.
pub fn flatten_record(contents: BTreeMap<String, LegacyValue>) -> Flattened {
    let mut flattened = Flattened::default();
    for (name, value) in contents {
        if let Some(plain) = flatten(value, &name, &mut flattened.diagnostics) {
            flattened.record.insert(name, plain);
        }
    }
    flattened
}

/// Flatten one value found at `path`.
///
/// Returns `None` when the value cannot be stored; diagnostics are pushed for
/// struct arrays and unconvertible cells, never for name lists.
pub fn flatten(
    value: LegacyValue,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PlainValue> {
    match value {
        LegacyValue::Numeric(array) => Some(PlainValue::Numeric(array)),
        LegacyValue::Text(text) => Some(PlainValue::Text(text)),
        LegacyValue::TextRows(rows) => Some(PlainValue::TextRows(rows)),
        LegacyValue::Bytes(bytes) => Some(PlainValue::Text(String::from_utf8_lossy(&bytes).to_string())),
        LegacyValue::Struct(array) => flatten_struct(array, path, diagnostics),
        LegacyValue::Cells(cells) => flatten_cells(cells, path, diagnostics),
        LegacyValue::List(_) => None,
        LegacyValue::Unsupported(reason) => {
            report(diagnostics, Diagnostic::new(path, reason));
            None
        },
    }
}

fn report(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    tracing::warn!(path = %diagnostic.path, "{}", diagnostic.message);
    diagnostics.push(diagnostic);
}

fn flatten_struct(
    array: StructArray,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PlainValue> {
    if array.fields.is_empty() {
        return Some(PlainValue::Map(Record::new()));
    }
    if array.len() != 1 {
        report(diagnostics, Diagnostic::new(path, STRUCT_ARRAY_MESSAGE));
        return None;
    }

    let StructArray {
        fields, elements, ..
    } = array;
    let mut record = Record::new();
    let values = elements.into_iter().next().unwrap_or_default();
    for (field, value) in fields.into_iter().zip(values) {
        let field_path = format!("{}/{}", path, field);
        if let Some(plain) = flatten(value, &field_path, diagnostics) {
            record.insert(field, plain);
        }
    }
    Some(PlainValue::Map(record))
}

/// Stack the first row of each cell into a 2-D `f64` array.
///
/// An empty cell array becomes a 0x0 array. Cells that are not numeric, or
/// whose first rows differ in length, cannot be stacked.
fn flatten_cells(
    cells: CellArray,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<PlainValue> {
    if cells.cells.is_empty() {
        return Some(PlainValue::Numeric(NumericArray::F64(ArrayD::zeros(IxDyn(&[0, 0])))));
    }

    let mut rows = Vec::with_capacity(cells.cells.len());
    for cell in &cells.cells {
        match cell {
            LegacyValue::Numeric(array) => rows.push(array.first_row()),
            _ => {
                report(diagnostics, Diagnostic::new(path, "Cannot convert non-numeric cell array to HDF5"));
                return None;
            },
        }
    }

    let width = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != width) {
        report(diagnostics, Diagnostic::new(path, "Cannot convert ragged cell array to HDF5"));
        return None;
    }

    let height = rows.len();
    let values: Vec<f64> = rows.into_iter().flatten().collect();
    match Array2::from_shape_vec((height, width), values) {
        Ok(stacked) => Some(PlainValue::Numeric(NumericArray::F64(stacked.into_dyn()))),
        Err(e) => {
            report(diagnostics, Diagnostic::new(path, format!("Cannot stack cell array: {}", e)));
            None
        },
    }
}
