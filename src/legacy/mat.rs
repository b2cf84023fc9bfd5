//! MATLAB Level-5 MAT-file decoding.
//!
//! A file is a 128-byte header followed by data elements. Each element starts
//! with an 8-byte tag (data type, byte count) or, for payloads of at most four
//! bytes, a packed 4-byte tag. Variables are `miMATRIX` elements, optionally
//! wrapped in zlib-compressed `miCOMPRESSED` elements.

use super::value::{CellArray, LegacyValue, NumericArray, StructArray};
use crate::error::{H5LensError, Result};
use flate2::read::ZlibDecoder;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

const HEADER_LEN: usize = 128;
const DESCRIPTION_LEN: usize = 116;

const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_INT16: u32 = 3;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_SINGLE: u32 = 7;
const MI_DOUBLE: u32 = 9;
const MI_INT64: u32 = 12;
const MI_UINT64: u32 = 13;
const MI_MATRIX: u32 = 14;
const MI_COMPRESSED: u32 = 15;
const MI_UTF8: u32 = 16;
const MI_UTF16: u32 = 17;
const MI_UTF32: u32 = 18;

const MX_CELL: u8 = 1;
const MX_STRUCT: u8 = 2;
const MX_OBJECT: u8 = 3;
const MX_CHAR: u8 = 4;
const MX_SPARSE: u8 = 5;
const MX_DOUBLE: u8 = 6;
const MX_SINGLE: u8 = 7;
const MX_INT8: u8 = 8;
const MX_UINT8: u8 = 9;
const MX_INT16: u8 = 10;
const MX_UINT16: u8 = 11;
const MX_INT32: u8 = 12;
const MX_UINT32: u8 = 13;
const MX_INT64: u8 = 14;
const MX_UINT64: u8 = 15;

const FLAG_COMPLEX: u32 = 0x0800;
const FLAG_GLOBAL: u32 = 0x0400;
const FLAG_LOGICAL: u32 = 0x0200;

/// Key holding the header text.
pub const HEADER_KEY: &str = "__header__";
/// Key holding the format version.
pub const VERSION_KEY: &str = "__version__";
/// Key holding the names of global variables.
pub const GLOBALS_KEY: &str = "__globals__";

/// Contents of a MAT file, keyed by variable name.
pub type MatContents = BTreeMap<String, LegacyValue>;

/// Byte order of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

impl Endian {
    fn u16(self, b: [u8; 2]) -> u16 {
        match self {
            Endian::Little => u16::from_le_bytes(b),
            Endian::Big => u16::from_be_bytes(b),
        }
    }

    fn u32(self, b: [u8; 4]) -> u32 {
        match self {
            Endian::Little => u32::from_le_bytes(b),
            Endian::Big => u32::from_be_bytes(b),
        }
    }

    fn u64(self, b: [u8; 8]) -> u64 {
        match self {
            Endian::Little => u64::from_le_bytes(b),
            Endian::Big => u64::from_be_bytes(b),
        }
    }
}

/// Read and decode a MAT file.
pub fn read_mat_file(path: &Path) -> Result<MatContents> {
    let bytes = std::fs::read(path)?;
    let contents = parse_mat(&bytes)?;
    tracing::info!(
        path = %path.display(),
        variables = contents.len(),
        "read MAT file"
    );
    Ok(contents)
}

/// Decode the bytes of a MAT file.
///
/// Besides the variables, the result holds the header text under
/// [`HEADER_KEY`], the format version under [`VERSION_KEY`] and the list of
/// global variables under [`GLOBALS_KEY`].
pub fn parse_mat(data: &[u8]) -> Result<MatContents> {
    ensure_len(data, 0, HEADER_LEN)?;

    if data.starts_with(b"MATLAB 7.3") {
        return Err(H5LensError::UnsupportedFormat(
            "MAT v7.3 files are HDF5; open them directly".to_string(),
        ));
    }

    let endian = match &data[126..128] {
        b"IM" => Endian::Little,
        b"MI" => Endian::Big,
        _ => {
            return Err(H5LensError::UnsupportedFormat(
                "not a Level-5 MAT file".to_string(),
            ))
        },
    };

    let version = endian.u16([data[124], data[125]]);
    let description = trim_header(&data[..DESCRIPTION_LEN]);

    let mut contents = MatContents::new();
    contents.insert(HEADER_KEY.to_string(), LegacyValue::Bytes(description.to_vec()));
    contents.insert(
        VERSION_KEY.to_string(),
        LegacyValue::Text(format!("{}.{}", version >> 8, version & 0xff)),
    );

    let mut globals = Vec::new();
    let mut reader = ElementReader::new(data, HEADER_LEN, endian);
    while let Some(element) = reader.next(false)? {
        let variable = match element.data_type {
            MI_MATRIX => parse_matrix(element.data, element.offset, endian)?,
            MI_COMPRESSED => {
                let inflated = inflate(element.data, element.offset)?;
                let mut inner = ElementReader::new(&inflated, 0, endian);
                let matrix = inner.expect(false, "compressed matrix")?;
                if matrix.data_type != MI_MATRIX {
                    tracing::warn!(
                        data_type = matrix.data_type,
                        "skipping compressed element that is not a matrix"
                    );
                    continue;
                }
                parse_matrix(matrix.data, matrix.offset, endian)?
            },
            other => {
                tracing::warn!(
                    data_type = other,
                    offset = element.offset,
                    "skipping top-level element that is not a matrix"
                );
                continue;
            },
        };

        if variable.global {
            globals.push(variable.name.clone());
        }
        contents.insert(variable.name, variable.value);
    }

    contents.insert(GLOBALS_KEY.to_string(), LegacyValue::List(globals));
    Ok(contents)
}

/// Strip the padding MATLAB leaves around the descriptive text.
fn trim_header(bytes: &[u8]) -> &[u8] {
    let is_pad = |b: &u8| matches!(b, b' ' | b'\t' | b'\n' | 0);
    let start = bytes.iter().position(|b| !is_pad(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !is_pad(b)).map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn ensure_len(data: &[u8], offset: usize, needed: usize) -> Result<()> {
    if offset + needed > data.len() {
        Err(H5LensError::mat_format(
            offset,
            format!(
                "unexpected end of data: need {} bytes, have {}",
                needed,
                data.len().saturating_sub(offset)
            ),
        ))
    } else {
        Ok(())
    }
}

fn inflate(data: &[u8], offset: usize) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| H5LensError::mat_format(offset, format!("bad compressed element: {}", e)))?;
    Ok(output)
}

/// A data element: its type and payload.
#[derive(Debug, Clone, Copy)]
struct Element<'a> {
    data_type: u32,
    data: &'a [u8],
    offset: usize,
}

/// Sequential reader over data elements.
#[derive(Debug)]
struct ElementReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ElementReader<'a> {
    fn new(data: &'a [u8], pos: usize, endian: Endian) -> Self {
        Self { data, pos, endian }
    }

    fn u32_at(&self, offset: usize) -> Result<u32> {
        ensure_len(self.data, offset, 4)?;
        let b = &self.data[offset..offset + 4];
        Ok(self.endian.u32([b[0], b[1], b[2], b[3]]))
    }

    /// Read the next element. Elements nested inside a matrix are padded to
    /// eight bytes; top-level element sizes already include their padding.
    fn next(&mut self, padded: bool) -> Result<Option<Element<'a>>> {
        if self.data.len().saturating_sub(self.pos) < 8 {
            return Ok(None);
        }

        let start = self.pos;
        let first = self.u32_at(start)?;

        if first >> 16 != 0 {
            let nbytes = (first >> 16) as usize;
            if nbytes > 4 {
                return Err(H5LensError::mat_format(
                    start,
                    format!("small element claims {} bytes", nbytes),
                ));
            }
            self.pos = start + 8;
            return Ok(Some(Element {
                data_type: first & 0xffff,
                data: &self.data[start + 4..start + 4 + nbytes],
                offset: start + 4,
            }));
        }

        let nbytes = self.u32_at(start + 4)? as usize;
        let data_start = start + 8;
        ensure_len(self.data, data_start, nbytes)?;

        let advance = if padded { (nbytes + 7) & !7 } else { nbytes };
        self.pos = (data_start + advance).min(self.data.len());

        Ok(Some(Element {
            data_type: first,
            data: &self.data[data_start..data_start + nbytes],
            offset: data_start,
        }))
    }

    fn expect(&mut self, padded: bool, what: &str) -> Result<Element<'a>> {
        let offset = self.pos;
        self.next(padded)?
            .ok_or_else(|| H5LensError::mat_format(offset, format!("missing {}", what)))
    }
}

/// Integer or floating-point payload before conversion to the array class.
#[derive(Debug)]
enum Storage {
    Int(Vec<i128>),
    Float(Vec<f64>),
}

impl Storage {
    fn len(&self) -> usize {
        match self {
            Storage::Int(v) => v.len(),
            Storage::Float(v) => v.len(),
        }
    }
}

macro_rules! cast_storage {
    ($storage:expr, $t:ty) => {
        match $storage {
            Storage::Int(values) => values.into_iter().map(|v| v as $t).collect::<Vec<$t>>(),
            Storage::Float(values) => values.into_iter().map(|v| v as $t).collect::<Vec<$t>>(),
        }
    };
}

fn decode_storage(element: &Element<'_>, endian: Endian) -> Result<Storage> {
    let bytes = element.data;
    let storage = match element.data_type {
        MI_INT8 => Storage::Int(bytes.iter().map(|&b| b as i8 as i128).collect()),
        MI_UINT8 | MI_UTF8 => Storage::Int(bytes.iter().map(|&b| b as i128).collect()),
        MI_INT16 => Storage::Int(
            bytes
                .chunks_exact(2)
                .map(|c| endian.u16([c[0], c[1]]) as i16 as i128)
                .collect(),
        ),
        MI_UINT16 | MI_UTF16 => Storage::Int(
            bytes
                .chunks_exact(2)
                .map(|c| endian.u16([c[0], c[1]]) as i128)
                .collect(),
        ),
        MI_INT32 => Storage::Int(
            bytes
                .chunks_exact(4)
                .map(|c| endian.u32([c[0], c[1], c[2], c[3]]) as i32 as i128)
                .collect(),
        ),
        MI_UINT32 | MI_UTF32 => Storage::Int(
            bytes
                .chunks_exact(4)
                .map(|c| endian.u32([c[0], c[1], c[2], c[3]]) as i128)
                .collect(),
        ),
        MI_INT64 => Storage::Int(
            bytes
                .chunks_exact(8)
                .map(|c| endian.u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as i64 as i128)
                .collect(),
        ),
        MI_UINT64 => Storage::Int(
            bytes
                .chunks_exact(8)
                .map(|c| endian.u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as i128)
                .collect(),
        ),
        MI_SINGLE => Storage::Float(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_bits(endian.u32([c[0], c[1], c[2], c[3]])) as f64)
                .collect(),
        ),
        MI_DOUBLE => Storage::Float(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_bits(endian.u64([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])))
                .collect(),
        ),
        other => {
            return Err(H5LensError::mat_format(
                element.offset,
                format!("data type {} cannot hold numbers", other),
            ))
        },
    };
    Ok(storage)
}

fn decode_dims(element: &Element<'_>, endian: Endian) -> Result<Vec<usize>> {
    match decode_storage(element, endian)? {
        Storage::Int(values) if values.iter().all(|&v| v >= 0) => {
            Ok(values.into_iter().map(|v| v as usize).collect())
        },
        _ => Err(H5LensError::mat_format(element.offset, "invalid dimensions")),
    }
}

/// Number of elements described by `dims`, rejecting sizes that overflow.
fn element_count(dims: &[usize], offset: usize) -> Result<usize> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| H5LensError::mat_format(offset, "dimensions overflow"))
}

fn decode_name(element: &Element<'_>) -> String {
    let end = element
        .data
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(element.data.len());
    String::from_utf8_lossy(&element.data[..end]).to_string()
}

/// A decoded `miMATRIX` element.
#[derive(Debug)]
struct Variable {
    name: String,
    value: LegacyValue,
    global: bool,
}

fn parse_matrix(data: &[u8], offset: usize, endian: Endian) -> Result<Variable> {
    if data.is_empty() {
        return Ok(Variable {
            name: String::new(),
            value: LegacyValue::Numeric(NumericArray::F64(ArrayD::zeros(IxDyn(&[0, 0])))),
            global: false,
        });
    }

    let mut reader = ElementReader::new(data, 0, endian);

    let flags_element = reader.expect(true, "array flags")?;
    if flags_element.data.len() < 4 {
        return Err(H5LensError::mat_format(offset, "array flags too short"));
    }
    let b = flags_element.data;
    let flags = endian.u32([b[0], b[1], b[2], b[3]]);
    let class = (flags & 0xff) as u8;

    let dims = decode_dims(&reader.expect(true, "dimensions")?, endian)?;
    let name = decode_name(&reader.expect(true, "array name")?);
    let count = element_count(&dims, offset)?;

    let value = match class {
        MX_CELL => {
            let mut cells = Vec::new();
            for _ in 0..count {
                let cell = reader.expect(true, "cell element")?;
                cells.push(parse_nested(cell, endian)?);
            }
            LegacyValue::Cells(CellArray { dims, cells })
        },
        MX_STRUCT => parse_struct(&mut reader, dims, count, endian)?,
        MX_CHAR => {
            let element = reader.expect(true, "character data")?;
            decode_chars(&element, &dims, endian)?
        },
        MX_DOUBLE..=MX_UINT64 if flags & FLAG_COMPLEX != 0 => {
            LegacyValue::Unsupported("complex arrays are not supported".to_string())
        },
        MX_DOUBLE..=MX_UINT64 => {
            let element = reader.expect(true, "real part")?;
            let storage = decode_storage(&element, endian)?;
            if storage.len() != count {
                return Err(H5LensError::mat_format(
                    element.offset,
                    format!("expected {} values, found {}", count, storage.len()),
                ));
            }
            let logical = flags & FLAG_LOGICAL != 0;
            LegacyValue::Numeric(to_numeric(class, logical, storage, &dims, element.offset)?)
        },
        MX_SPARSE => LegacyValue::Unsupported("sparse arrays are not supported".to_string()),
        MX_OBJECT => LegacyValue::Unsupported("MATLAB objects are not supported".to_string()),
        other => LegacyValue::Unsupported(format!("array class {} is not supported", other)),
    };

    Ok(Variable {
        name,
        value,
        global: flags & FLAG_GLOBAL != 0,
    })
}

fn parse_nested(element: Element<'_>, endian: Endian) -> Result<LegacyValue> {
    if element.data_type != MI_MATRIX {
        return Err(H5LensError::mat_format(
            element.offset,
            format!("expected a matrix element, found type {}", element.data_type),
        ));
    }
    Ok(parse_matrix(element.data, element.offset, endian)?.value)
}

fn parse_struct(
    reader: &mut ElementReader<'_>,
    dims: Vec<usize>,
    count: usize,
    endian: Endian,
) -> Result<LegacyValue> {
    let length_element = reader.expect(true, "field name length")?;
    let name_len = match decode_storage(&length_element, endian)? {
        Storage::Int(values) => values.first().copied().unwrap_or(0).max(0) as usize,
        Storage::Float(_) => {
            return Err(H5LensError::mat_format(
                length_element.offset,
                "field name length must be an integer",
            ))
        },
    };

    let names_element = reader.expect(true, "field names")?;
    let fields: Vec<String> = if name_len == 0 {
        Vec::new()
    } else {
        names_element
            .data
            .chunks(name_len)
            .map(|chunk| {
                let end = chunk.iter().position(|&b| b == 0).unwrap_or(chunk.len());
                String::from_utf8_lossy(&chunk[..end]).to_string()
            })
            .collect()
    };

    let mut elements = Vec::new();
    for _ in 0..count {
        let mut values = Vec::with_capacity(fields.len());
        for _ in &fields {
            let field = reader.expect(true, "struct field")?;
            values.push(parse_nested(field, endian)?);
        }
        elements.push(values);
    }

    Ok(LegacyValue::Struct(StructArray {
        dims,
        fields,
        elements,
    }))
}

/// Character arrays are stored column-major; each row becomes one string.
fn decode_chars(element: &Element<'_>, dims: &[usize], endian: Endian) -> Result<LegacyValue> {
    let chars: Vec<char> = match element.data_type {
        MI_UTF8 => String::from_utf8_lossy(element.data).chars().collect(),
        MI_UINT16 | MI_UTF16 => {
            let units: Vec<u16> = element
                .data
                .chunks_exact(2)
                .map(|c| endian.u16([c[0], c[1]]))
                .collect();
            char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()
        },
        _ => match decode_storage(element, endian)? {
            Storage::Int(codes) => codes
                .into_iter()
                .map(|c| {
                    u32::try_from(c)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
            Storage::Float(_) => {
                return Err(H5LensError::mat_format(
                    element.offset,
                    "character data stored as floating point",
                ))
            },
        },
    };

    let rows = dims.first().copied().unwrap_or(0);
    let cols = element_count(dims.get(1..).unwrap_or_default(), element.offset)?;
    let expected = rows
        .checked_mul(cols)
        .ok_or_else(|| H5LensError::mat_format(element.offset, "dimensions overflow"))?;
    if expected != chars.len() {
        return Err(H5LensError::mat_format(
            element.offset,
            format!("expected {} characters, found {}", expected, chars.len()),
        ));
    }

    let lines: Vec<String> = (0..rows)
        .map(|r| (0..cols).map(|c| chars[r + rows * c]).collect())
        .collect();

    Ok(match lines.len() {
        0 => LegacyValue::Text(String::new()),
        1 => LegacyValue::Text(lines.into_iter().collect()),
        _ => LegacyValue::TextRows(lines),
    })
}

fn column_major<T>(dims: &[usize], values: Vec<T>, offset: usize) -> Result<ArrayD<T>>
where
    T: Clone,
{
    let array = ArrayD::from_shape_vec(IxDyn(dims).f(), values)
        .map_err(|e| H5LensError::mat_format(offset, format!("bad array shape: {}", e)))?;
    Ok(array.as_standard_layout().into_owned())
}

fn to_numeric(
    class: u8,
    logical: bool,
    storage: Storage,
    dims: &[usize],
    offset: usize,
) -> Result<NumericArray> {
    if logical {
        let values = match storage {
            Storage::Int(v) => v.into_iter().map(|x| x != 0).collect(),
            Storage::Float(v) => v.into_iter().map(|x| x != 0.0).collect(),
        };
        return Ok(NumericArray::Bool(column_major(dims, values, offset)?));
    }

    let array = match class {
        MX_DOUBLE => NumericArray::F64(column_major(dims, cast_storage!(storage, f64), offset)?),
        MX_SINGLE => NumericArray::F32(column_major(dims, cast_storage!(storage, f32), offset)?),
        MX_INT8 => NumericArray::I8(column_major(dims, cast_storage!(storage, i8), offset)?),
        MX_UINT8 => NumericArray::U8(column_major(dims, cast_storage!(storage, u8), offset)?),
        MX_INT16 => NumericArray::I16(column_major(dims, cast_storage!(storage, i16), offset)?),
        MX_UINT16 => NumericArray::U16(column_major(dims, cast_storage!(storage, u16), offset)?),
        MX_INT32 => NumericArray::I32(column_major(dims, cast_storage!(storage, i32), offset)?),
        MX_UINT32 => NumericArray::U32(column_major(dims, cast_storage!(storage, u32), offset)?),
        MX_INT64 => NumericArray::I64(column_major(dims, cast_storage!(storage, i64), offset)?),
        MX_UINT64 => NumericArray::U64(column_major(dims, cast_storage!(storage, u64), offset)?),
        other => {
            return Err(H5LensError::mat_format(
                offset,
                format!("array class {} is not numeric", other),
            ))
        },
    };
    Ok(array)
}
