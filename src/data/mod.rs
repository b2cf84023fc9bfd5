//! Data reading and representation.
//!
//! This module opens HDF5 files and mirrors their structure as a tree of
//! display nodes.

mod details;
mod node;
mod session;
pub mod walker;

pub use details::{EntryDetails, Preview, TOO_LARGE_MARKER};
pub use node::{join_path, DisplayNode, NodeKind};
pub use session::Session;
pub use walker::{populate, Container, ObjectKind};
