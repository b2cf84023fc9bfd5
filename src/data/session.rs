//! HDF5 file session: the one open handle behind a loaded tree.

use super::details::EntryDetails;
use super::node::{join_path, DisplayNode};
use super::walker::{populate, Container, ObjectKind};
use crate::error::{H5LensError, Result};
use hdf5::{Location, LocationType};
use ndarray::ArrayD;
use std::path::{Path, PathBuf};

/// An open, read-only HDF5 file.
///
/// The handle is owned exclusively by the session and closed when the session
/// is dropped.
#[derive(Debug)]
pub struct Session {
    file: hdf5::File,
    path: PathBuf,
}

impl Session {
    /// Open an existing file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            hdf5::File::open(path).map_err(|e| H5LensError::file_open(path.to_path_buf(), e))?;
        tracing::info!(path = %path.display(), "opened HDF5 file");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path of the open file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used as the root label.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string())
    }

    /// Walk the whole file into a display tree.
    pub fn populate(&self) -> Result<DisplayNode> {
        populate(self, "/", &self.file_name())
    }

    /// Details of the dataset at `path`, or of one of its attributes.
    ///
    /// Groups and committed datatypes have no details and return `None`;
    /// their attributes do.
    pub fn details(
        &self,
        path: &str,
        attribute: Option<&str>,
        preview_limit: usize,
    ) -> Result<Option<EntryDetails>> {
        if let Some(name) = attribute {
            let attr = self.location(path)?.attr(name)?;
            let details = EntryDetails::read(&attr, join_path(path, name), preview_limit)?;
            return Ok(Some(details));
        }

        match self.location_type(path)? {
            LocationType::Dataset => {
                let dataset = self.file.dataset(path)?;
                let details = EntryDetails::read(&dataset, path.to_string(), preview_limit)?;
                Ok(Some(details))
            },
            _ => Ok(None),
        }
    }

    /// Read a whole dataset as `f64` for plotting.
    pub fn read_numeric(&self, path: &str) -> Result<ArrayD<f64>> {
        let dataset = self.file.dataset(path)?;
        let data = dataset.read_dyn::<f64>()?;
        tracing::debug!(path, shape = ?data.shape(), "read dataset for plotting");
        Ok(data)
    }

    /// Close the file.
    pub fn close(self) {
        tracing::info!(path = %self.path.display(), "closed HDF5 file");
    }
}

impl Session {
    fn location_type(&self, path: &str) -> Result<LocationType> {
        if path != "/" && !self.file.link_exists(path) {
            return Err(H5LensError::node_not_found(path));
        }
        Ok(self.file.loc_type_by_name(path)?)
    }

    /// Any object by path: group, dataset or committed datatype.
    fn location(&self, path: &str) -> Result<Location> {
        if path != "/" && !self.file.link_exists(path) {
            return Err(H5LensError::node_not_found(path));
        }
        let info = self.file.loc_info_by_name(path)?;
        Ok(self.file.open_by_token(info.token)?)
    }
}

impl Container for Session {
    fn member_names(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.file.group(path)?.member_names()?)
    }

    fn object_kind(&self, path: &str) -> Result<ObjectKind> {
        match self.location_type(path)? {
            LocationType::Group => Ok(ObjectKind::Group),
            _ => Ok(ObjectKind::Dataset),
        }
    }

    fn attr_names(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.location(path)?.attr_names()?)
    }
}
