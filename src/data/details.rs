//! Type, shape, size and text preview of a selected entry.

use crate::error::Result;
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use ndarray::ArrayD;
use std::fmt::Display;

/// Longest fixed-length string element that is previewed.
const MAX_FIXED_STRING_LEN: usize = 65536;

/// Text shown instead of the contents of entries above the preview limit.
pub const TOO_LARGE_MARKER: &str = "[DATA > 1 MiB]";

/// Rendered contents of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Contents rendered as text.
    Text(String),
    /// Contents exceed the preview limit and were not read.
    TooLarge,
    /// Contents could not be rendered (unsupported element type).
    Unavailable(String),
}

impl Preview {
    /// Text shown in the details pane.
    pub fn as_text(&self) -> &str {
        match self {
            Preview::Text(text) => text,
            Preview::TooLarge => TOO_LARGE_MARKER,
            Preview::Unavailable(reason) => reason,
        }
    }
}

/// Details of a dataset or attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetails {
    /// Path shown to the user.
    pub path: String,
    /// Element type name.
    pub dtype: String,
    /// Shape (empty for scalars).
    pub shape: Vec<usize>,
    /// Storage size in bytes (elements times element size).
    pub byte_size: usize,
    /// Contents or truncation marker.
    pub preview: Preview,
}

impl EntryDetails {
    /// Read details from a dataset or attribute.
    ///
    /// Contents are only read when `byte_size <= preview_limit`.
    pub fn read(container: &hdf5::Container, path: String, preview_limit: usize) -> Result<Self> {
        let dtype = container.dtype()?;
        let descriptor = dtype.to_descriptor()?;
        let shape = container.shape();
        let byte_size = container.size() * dtype.size();

        let preview = if byte_size > preview_limit {
            Preview::TooLarge
        } else {
            read_preview(container, &descriptor)?
        };

        Ok(Self {
            path,
            dtype: type_name(&descriptor),
            shape,
            byte_size,
            preview,
        })
    }

    /// Shape formatted like `(3, 4)`; scalars show `()`.
    pub fn shape_label(&self) -> String {
        match self.shape.as_slice() {
            [] => "()".to_string(),
            [n] => format!("({},)", n),
            dims => format!(
                "({})",
                dims.iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// Short name for an HDF5 element type.
pub(crate) fn type_name(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Integer(size) => format!("int{}", *size as usize * 8),
        TypeDescriptor::Unsigned(size) => format!("uint{}", *size as usize * 8),
        TypeDescriptor::Float(size) => format!("float{}", *size as usize * 8),
        TypeDescriptor::Boolean => "bool".to_string(),
        TypeDescriptor::FixedAscii(len) => format!("ascii[{}]", len),
        TypeDescriptor::FixedUnicode(len) => format!("utf-8[{}]", len),
        TypeDescriptor::VarLenAscii => "ascii (var len)".to_string(),
        TypeDescriptor::VarLenUnicode => "utf-8 (var len)".to_string(),
        other => format!("{:?}", other).to_lowercase(),
    }
}

fn read_preview(container: &hdf5::Container, descriptor: &TypeDescriptor) -> Result<Preview> {
    let text = match descriptor {
        TypeDescriptor::Integer(_) => render_array(&container.read_dyn::<i64>()?),
        TypeDescriptor::Unsigned(_) => render_array(&container.read_dyn::<u64>()?),
        TypeDescriptor::Float(_) => render_array(&container.read_dyn::<f64>()?),
        TypeDescriptor::Boolean => render_array(&container.read_dyn::<bool>()?),
        TypeDescriptor::VarLenUnicode => {
            let values = container.read_raw::<VarLenUnicode>()?;
            join_strings(values.iter().map(|s| s.as_str()), false)
        },
        TypeDescriptor::VarLenAscii => {
            let values = container.read_raw::<VarLenAscii>()?;
            join_strings(values.iter().map(|s| s.as_str()), false)
        },
        TypeDescriptor::FixedAscii(len) | TypeDescriptor::FixedUnicode(len)
            if *len > MAX_FIXED_STRING_LEN =>
        {
            return Ok(Preview::Unavailable(format!(
                "[strings longer than {} bytes]",
                MAX_FIXED_STRING_LEN
            )))
        },
        TypeDescriptor::FixedAscii(len) => match *len {
            0..=256 => read_fixed_ascii::<256>(container, *len)?,
            257..=4096 => read_fixed_ascii::<4096>(container, *len)?,
            _ => read_fixed_ascii::<MAX_FIXED_STRING_LEN>(container, *len)?,
        },
        TypeDescriptor::FixedUnicode(len) => match *len {
            0..=256 => read_fixed_unicode::<256>(container, *len)?,
            257..=4096 => read_fixed_unicode::<4096>(container, *len)?,
            _ => read_fixed_unicode::<MAX_FIXED_STRING_LEN>(container, *len)?,
        },
        other => {
            return Ok(Preview::Unavailable(format!(
                "[no preview for {}]",
                type_name(other)
            )))
        },
    };

    Ok(Preview::Text(text))
}

/// Fixed-length strings are read into a buffer type at least `len` wide so
/// nothing is cut off.
fn read_fixed_ascii<const N: usize>(container: &hdf5::Container, len: usize) -> Result<String> {
    let values = container.read_raw::<FixedAscii<N>>()?;
    Ok(join_strings(values.iter().map(|s| s.as_str()), len == 1))
}

fn read_fixed_unicode<const N: usize>(container: &hdf5::Container, len: usize) -> Result<String> {
    let values = container.read_raw::<FixedUnicode<N>>()?;
    Ok(join_strings(values.iter().map(|s| s.as_str()), len == 1))
}

/// Render an array the way ndarray displays it; scalars show the bare value.
pub(crate) fn render_array<T: Display>(array: &ArrayD<T>) -> String {
    format!("{}", array)
}

/// Single-character strings are a char array and are concatenated; longer
/// strings are shown one per line.
fn join_strings<'a>(values: impl Iterator<Item = &'a str>, chars: bool) -> String {
    let separator = if chars { "" } else { "\n" };
    values.collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdf5::types::{FloatSize, IntSize};
    use ndarray::{arr0, arr2};

    #[test]
    fn type_names_follow_numpy_style() {
        assert_eq!(type_name(&TypeDescriptor::Integer(IntSize::U4)), "int32");
        assert_eq!(type_name(&TypeDescriptor::Unsigned(IntSize::U1)), "uint8");
        assert_eq!(type_name(&TypeDescriptor::Float(FloatSize::U8)), "float64");
        assert_eq!(type_name(&TypeDescriptor::FixedAscii(5)), "ascii[5]");
    }

    #[test]
    fn scalar_renders_bare_value() {
        assert_eq!(render_array(&arr0(42i64).into_dyn()), "42");
    }

    #[test]
    fn matrix_renders_nested_brackets() {
        let text = render_array(&arr2(&[[1i64, 2], [3, 4]]).into_dyn());
        assert_eq!(text, "[[1, 2],\n [3, 4]]");
    }

    #[test]
    fn char_arrays_are_concatenated() {
        assert_eq!(join_strings(["h", "i"].into_iter(), true), "hi");
        assert_eq!(join_strings(["ab", "cd"].into_iter(), false), "ab\ncd");
    }

    #[test]
    fn shape_labels() {
        let mut details = EntryDetails {
            path: "/x".to_string(),
            dtype: "int32".to_string(),
            shape: vec![],
            byte_size: 4,
            preview: Preview::TooLarge,
        };
        assert_eq!(details.shape_label(), "()");
        details.shape = vec![3];
        assert_eq!(details.shape_label(), "(3,)");
        details.shape = vec![3, 4];
        assert_eq!(details.shape_label(), "(3, 4)");
        assert_eq!(details.preview.as_text(), TOO_LARGE_MARKER);
    }
}
