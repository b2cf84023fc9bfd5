//! Helpers shared by the integration tests: MAT-file and HDF5 fixtures.
#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use hdf5::types::VarLenUnicode;
use ndarray::{arr1, arr2, Array1};
use std::io::Write;
use std::path::Path;

pub const MI_INT8: u32 = 1;
pub const MI_UINT16: u32 = 4;
pub const MI_INT32: u32 = 5;
pub const MI_UINT32: u32 = 6;
pub const MI_DOUBLE: u32 = 9;
pub const MI_MATRIX: u32 = 14;
pub const MI_COMPRESSED: u32 = 15;

pub const MX_CELL: u32 = 1;
pub const MX_STRUCT: u32 = 2;
pub const MX_CHAR: u32 = 4;
pub const MX_SPARSE: u32 = 5;
pub const MX_DOUBLE: u32 = 6;
pub const MX_INT32: u32 = 12;
pub const MX_UINT8: u32 = 9;

pub const LOGICAL: u32 = 0x0200;
pub const GLOBAL: u32 = 0x0400;

/// Little-endian Level-5 MAT file under construction.
#[derive(Debug, Default)]
pub struct MatBuilder {
    body: Vec<u8>,
}

fn padded(mut bytes: Vec<u8>) -> Vec<u8> {
    while bytes.len() % 8 != 0 {
        bytes.push(0);
    }
    bytes
}

/// A data element with a full 8-byte tag, padded to eight bytes.
pub fn element(data_type: u32, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&data_type.to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    padded(out)
}

/// A data element packed into a 4-byte tag.
pub fn small_element(data_type: u32, data: &[u8]) -> Vec<u8> {
    assert!(data.len() <= 4);
    let mut out = Vec::new();
    out.extend_from_slice(&(((data.len() as u32) << 16) | data_type).to_le_bytes());
    out.extend_from_slice(data);
    padded(out)
}

fn i32_bytes(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn f64_bytes(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A complete `miMATRIX` element.
pub fn matrix(name: &str, class: u32, flags: u32, dims: &[i32], parts: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    let flag_words = [class | flags, 0];
    let flag_bytes: Vec<u8> = flag_words.iter().flat_map(|w| w.to_le_bytes()).collect();
    body.extend(element(MI_UINT32, &flag_bytes));
    body.extend(element(MI_INT32, &i32_bytes(dims)));
    if !name.is_empty() && name.len() <= 4 {
        body.extend(small_element(MI_INT8, name.as_bytes()));
    } else {
        body.extend(element(MI_INT8, name.as_bytes()));
    }
    for part in parts {
        body.extend_from_slice(part);
    }
    element(MI_MATRIX, &body)
}

/// A double matrix given in MATLAB (column-major) order.
pub fn double(name: &str, dims: &[i32], column_major: &[f64]) -> Vec<u8> {
    matrix(
        name,
        MX_DOUBLE,
        0,
        dims,
        &[element(MI_DOUBLE, &f64_bytes(column_major))],
    )
}

/// An int32 matrix given in column-major order.
pub fn int32(name: &str, dims: &[i32], column_major: &[i32]) -> Vec<u8> {
    matrix(
        name,
        MX_INT32,
        0,
        dims,
        &[element(MI_INT32, &i32_bytes(column_major))],
    )
}

/// A logical row vector; MATLAB stores logicals as uint8.
pub fn logical(name: &str, values: &[bool]) -> Vec<u8> {
    let bytes: Vec<u8> = values.iter().map(|&b| b as u8).collect();
    matrix(
        name,
        MX_UINT8,
        LOGICAL,
        &[1, values.len() as i32],
        &[element(2, &bytes)],
    )
}

/// A character array with one row per string; rows must have equal length.
pub fn chars(name: &str, rows: &[&str]) -> Vec<u8> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut units = Vec::new();
    for col in 0..width {
        for row in rows {
            let c = row.chars().nth(col).unwrap_or(' ');
            units.extend_from_slice(&(c as u16).to_le_bytes());
        }
    }
    matrix(
        name,
        MX_CHAR,
        0,
        &[rows.len() as i32, width as i32],
        &[element(MI_UINT16, &units)],
    )
}

/// A struct array; `elements` holds one matrix per field for each element.
pub fn structure(name: &str, dims: &[i32], fields: &[&str], elements: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let name_len = 32usize;
    let mut names = Vec::new();
    for field in fields {
        let mut bytes = field.as_bytes().to_vec();
        bytes.resize(name_len, 0);
        names.extend(bytes);
    }

    let mut parts = vec![
        small_element(MI_INT32, &(name_len as i32).to_le_bytes()),
        element(MI_INT8, &names),
    ];
    for values in elements {
        parts.extend(values.iter().cloned());
    }
    matrix(name, MX_STRUCT, 0, dims, &parts)
}

/// A cell array of the given cells.
pub fn cells(name: &str, dims: &[i32], items: &[Vec<u8>]) -> Vec<u8> {
    matrix(name, MX_CELL, 0, dims, items)
}

/// Wrap an element in a zlib-compressed `miCOMPRESSED` element.
pub fn compressed(inner: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(inner).unwrap();
    let deflated = encoder.finish().unwrap();

    let mut out = Vec::new();
    out.extend_from_slice(&MI_COMPRESSED.to_le_bytes());
    out.extend_from_slice(&(deflated.len() as u32).to_le_bytes());
    out.extend(deflated);
    out
}

impl MatBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, element: Vec<u8>) -> Self {
        self.body.extend(element);
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut header = b"MATLAB 5.0 MAT-file, Platform: GLNXA64, Created on: test".to_vec();
        header.resize(116, b' ');
        header.extend_from_slice(&[0u8; 8]);
        header.extend_from_slice(&0x0100u16.to_le_bytes());
        header.extend_from_slice(b"IM");
        header.extend_from_slice(&self.body);
        header
    }

    pub fn write(&self, path: &Path) {
        std::fs::write(path, self.bytes()).unwrap();
    }
}

/// A MAT file exercising every supported class.
pub fn sample_mat() -> MatBuilder {
    MatBuilder::new()
        // [1 2 3; 4 5 6]
        .push(double("a", &[2, 3], &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]))
        .push(int32("count", &[1, 1], &[42]))
        .push(logical("flags", &[true, false, true]))
        .push(chars("greeting", &["hello"]))
        .push(chars("lines", &["ab", "cd"]))
        .push(structure(
            "s",
            &[1, 1],
            &["x", "inner", "label"],
            &[vec![
                double("", &[1, 1], &[2.5]),
                structure(
                    "",
                    &[1, 2],
                    &["v"],
                    &[
                        vec![double("", &[1, 1], &[1.0])],
                        vec![double("", &[1, 1], &[2.0])],
                    ],
                ),
                chars("", &["tag"]),
            ]],
        ))
        .push(cells(
            "c",
            &[1, 2],
            &[
                double("", &[1, 3], &[1.0, 2.0, 3.0]),
                double("", &[1, 3], &[4.0, 5.0, 6.0]),
            ],
        ))
        .push(compressed(&double("z", &[3, 1], &[7.0, 8.0, 9.0])))
}

/// An HDF5 file with mixed-case names, nested groups and attributes.
///
/// ```text
/// /                 attrs: title
/// ├── Beta/         attrs: kind
/// │   └── values    attrs: units, scale
/// ├── alpha         (3,)
/// ├── big           (131073,) float64
/// ├── exact         (131072,) float64
/// └── gamma/
///     └── x         (3,)
/// ```
pub fn sample_h5(path: &Path) {
    let file = hdf5::File::create(path).unwrap();
    write_str_attr(&file, "title", "sample");

    let beta = file.create_group("Beta").unwrap();
    write_str_attr(&beta, "kind", "group");
    let values = beta
        .new_dataset_builder()
        .with_data(&arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]))
        .create("values")
        .unwrap();
    write_str_attr(&values, "units", "m");
    values
        .new_attr::<f64>()
        .create("scale")
        .unwrap()
        .write_scalar(&0.5)
        .unwrap();

    file.new_dataset_builder()
        .with_data(&arr1(&[10i32, 20, 30]))
        .create("alpha")
        .unwrap();
    file.new_dataset_builder()
        .with_data(&Array1::<f64>::zeros(131_073))
        .create("big")
        .unwrap();
    file.new_dataset_builder()
        .with_data(&Array1::<f64>::ones(131_072))
        .create("exact")
        .unwrap();

    let gamma = file.create_group("gamma").unwrap();
    gamma
        .new_dataset_builder()
        .with_data(&arr1(&[0.1f64, 0.2, 0.3]))
        .create("x")
        .unwrap();
}

/// Commit a named copy of the `int32` datatype at `name` below `location`.
///
/// The high-level API has no call for this, so it goes through the C library
/// under the crate's global lock.
pub fn commit_datatype(location: &hdf5::Location, name: &str) {
    use hdf5_sys::h5p::H5P_DEFAULT;
    use hdf5_sys::h5t::{H5Tclose, H5Tcommit2, H5Tcopy};

    let dtype = hdf5::Datatype::from_type::<i32>().unwrap();
    let name = std::ffi::CString::new(name).unwrap();
    let status = hdf5::sync::sync(|| unsafe {
        let copy = H5Tcopy(dtype.id());
        let committed = H5Tcommit2(
            location.id(),
            name.as_ptr(),
            copy,
            H5P_DEFAULT,
            H5P_DEFAULT,
            H5P_DEFAULT,
        );
        H5Tclose(copy);
        committed
    });
    assert!(status >= 0, "committing datatype failed");
}

/// An HDF5 file holding a dataset and a committed datatype carrying an attribute.
pub fn named_type_h5(path: &Path) {
    let file = hdf5::File::create(path).unwrap();
    file.new_dataset_builder()
        .with_data(&arr1(&[1.0f64, 2.0]))
        .create("data")
        .unwrap();
    commit_datatype(&file, "T");

    let info = file.loc_info_by_name("T").unwrap();
    let named = file.open_by_token(info.token).unwrap();
    write_str_attr(&named, "note", "shared type");
}

fn write_str_attr(location: &hdf5::Location, name: &str, value: &str) {
    location
        .new_attr::<VarLenUnicode>()
        .create(name)
        .unwrap()
        .write_scalar(&value.parse::<VarLenUnicode>().unwrap())
        .unwrap();
}
