//! Values decoded from a legacy MAT file.

use ndarray::{ArrayD, Axis};

/// Numeric n-dimensional array with its element type preserved.
///
/// Arrays are kept in standard (row-major) layout; indices match MATLAB's.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    /// `double`
    F64(ArrayD<f64>),
    /// `single`
    F32(ArrayD<f32>),
    /// `int8`
    I8(ArrayD<i8>),
    /// `int16`
    I16(ArrayD<i16>),
    /// `int32`
    I32(ArrayD<i32>),
    /// `int64`
    I64(ArrayD<i64>),
    /// `uint8`
    U8(ArrayD<u8>),
    /// `uint16`
    U16(ArrayD<u16>),
    /// `uint32`
    U32(ArrayD<u32>),
    /// `uint64`
    U64(ArrayD<u64>),
    /// `logical`
    Bool(ArrayD<bool>),
}

macro_rules! with_array {
    ($value:expr, $array:ident => $body:expr) => {
        match $value {
            NumericArray::F64($array) => $body,
            NumericArray::F32($array) => $body,
            NumericArray::I8($array) => $body,
            NumericArray::I16($array) => $body,
            NumericArray::I32($array) => $body,
            NumericArray::I64($array) => $body,
            NumericArray::U8($array) => $body,
            NumericArray::U16($array) => $body,
            NumericArray::U32($array) => $body,
            NumericArray::U64($array) => $body,
            NumericArray::Bool($array) => $body,
        }
    };
}
pub(crate) use with_array;

impl NumericArray {
    /// Shape of the array.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, a => a.shape())
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name.
    pub fn dtype(&self) -> &'static str {
        match self {
            NumericArray::F64(_) => "float64",
            NumericArray::F32(_) => "float32",
            NumericArray::I8(_) => "int8",
            NumericArray::I16(_) => "int16",
            NumericArray::I32(_) => "int32",
            NumericArray::I64(_) => "int64",
            NumericArray::U8(_) => "uint8",
            NumericArray::U16(_) => "uint16",
            NumericArray::U32(_) => "uint32",
            NumericArray::U64(_) => "uint64",
            NumericArray::Bool(_) => "bool",
        }
    }

    /// Convert every element to `f64`.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            NumericArray::F64(a) => a.clone(),
            NumericArray::F32(a) => a.mapv(f64::from),
            NumericArray::I8(a) => a.mapv(f64::from),
            NumericArray::I16(a) => a.mapv(f64::from),
            NumericArray::I32(a) => a.mapv(f64::from),
            NumericArray::I64(a) => a.mapv(|v| v as f64),
            NumericArray::U8(a) => a.mapv(f64::from),
            NumericArray::U16(a) => a.mapv(f64::from),
            NumericArray::U32(a) => a.mapv(f64::from),
            NumericArray::U64(a) => a.mapv(|v| v as f64),
            NumericArray::Bool(a) => a.mapv(|v| if v { 1.0 } else { 0.0 }),
        }
    }

    /// First row as `f64`: index 0 along the first axis, flattened.
    ///
    /// One-dimensional arrays return all elements, scalars a single value.
    pub fn first_row(&self) -> Vec<f64> {
        let values = self.to_f64();
        match values.ndim() {
            0 | 1 => values.iter().copied().collect(),
            _ if values.shape()[0] == 0 => Vec::new(),
            _ => values.index_axis(Axis(0), 0).iter().copied().collect(),
        }
    }
}

/// Array of records with named fields (a MATLAB struct array).
#[derive(Debug, Clone, PartialEq)]
pub struct StructArray {
    /// MATLAB dimensions.
    pub dims: Vec<usize>,
    /// Field names, in file order.
    pub fields: Vec<String>,
    /// One entry per element (column-major order), each holding one value per field.
    pub elements: Vec<Vec<LegacyValue>>,
}

impl StructArray {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the array holds no records.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Array whose elements are themselves arrays (a MATLAB cell array).
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    /// MATLAB dimensions.
    pub dims: Vec<usize>,
    /// Cells in column-major order.
    pub cells: Vec<LegacyValue>,
}

/// A value as decoded from a MAT file, classified once at the reader boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyValue {
    /// Numeric or logical array.
    Numeric(NumericArray),
    /// Character array with a single row.
    Text(String),
    /// Character array with several rows.
    TextRows(Vec<String>),
    /// Raw byte string (the file header).
    Bytes(Vec<u8>),
    /// Struct array.
    Struct(StructArray),
    /// Cell array.
    Cells(CellArray),
    /// List of names (the global variable list).
    List(Vec<String>),
    /// Array class the converter cannot represent; the reason is kept for diagnostics.
    Unsupported(String),
}
