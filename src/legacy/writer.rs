//! Persist a flattened record as HDF5 groups and datasets.

use super::flatten::{PlainValue, Record};
use super::value::{with_array, NumericArray};
use crate::error::Result;
use hdf5::types::VarLenUnicode;
use hdf5::Group;
use ndarray::ArrayView1;

/// Write every entry of `record` below `group`.
///
/// Maps become groups, numeric arrays datasets of their native element type,
/// text a scalar variable-length UTF-8 dataset and text rows a 1-D one.
pub fn write_record(group: &Group, record: &Record) -> Result<()> {
    for (name, value) in record {
        write_value(group, name, value)?;
    }
    Ok(())
}

fn write_value(group: &Group, name: &str, value: &PlainValue) -> Result<()> {
    match value {
        PlainValue::Map(record) => {
            let child = group.create_group(name)?;
            write_record(&child, record)?;
        },
        PlainValue::Numeric(array) => write_numeric(group, name, array)?,
        PlainValue::Text(text) => {
            group
                .new_dataset::<VarLenUnicode>()
                .shape(())
                .create(name)?
                .write_scalar(&to_var_len_unicode(text)?)?;
        },
        PlainValue::TextRows(rows) => {
            let values = rows
                .iter()
                .map(|row| to_var_len_unicode(row))
                .collect::<Result<Vec<_>>>()?;
            group
                .new_dataset::<VarLenUnicode>()
                .shape((values.len(),))
                .create(name)?
                .write(ArrayView1::from(values.as_slice()))?;
        },
    }
    tracing::debug!(group = %group.name(), name, "wrote entry");
    Ok(())
}

fn write_numeric(group: &Group, name: &str, array: &NumericArray) -> Result<()> {
    with_array!(array, a => {
        group.new_dataset_builder().with_data(a.view()).create(name)?;
    });
    Ok(())
}

fn to_var_len_unicode(value: &str) -> Result<VarLenUnicode> {
    value
        .parse::<VarLenUnicode>()
        .map_err(|e| hdf5::Error::from(format!("invalid string {:?}: {}", value, e)).into())
}
