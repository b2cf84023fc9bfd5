//! h5lens - A fast, terminal-based HDF5 data viewer.
//!
//! h5lens shows the structure of an HDF5 file as a navigable tree with
//! vim-style keys, previews the selected dataset or attribute, and plots one
//! dataset, or one dataset against another. It also converts MATLAB
//! Level-5 `.mat` files to HDF5.
//!
//! # Features
//!
//! - Full hierarchy walk with attributes shown under their owners
//! - Type, shape, size and contents of the selected entry
//! - Line plots, optionally against a chosen X dataset
//! - Search, clipboard integration and Gruvbox color themes
//! - MAT to HDF5 conversion
//!
//! # Example
//!
//! ```ignore
//! use h5lens::data::Session;
//! use std::path::Path;
//!
//! let session = Session::open(Path::new("data.h5"))?;
//! let root = session.populate()?;
//! println!("Loaded {} with {} children", root.name, root.children.len());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod explorer;
pub mod legacy;
pub mod plot;
pub mod search;
pub mod ui;
pub mod util;

pub use error::{H5LensError, Result};
