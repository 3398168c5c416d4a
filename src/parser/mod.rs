//! Parser module for modscope.
//!
//! This module loads Go package metadata and normalizes it into a
//! [`PackageSet`] rooted at the analyzed package.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use modscope::parser::{GoListProvider, PackageProvider};
//!
//! let provider = GoListProvider::default();
//! let packages = provider.load(Path::new("./cmd/server")).unwrap();
//!
//! println!("{} packages reachable from {}", packages.len(), packages.root_id());
//! ```

pub mod go_list;
pub mod types;

pub use go_list::{parse_str, GoListProvider, LoadError, LoadResult, PackageProvider};
pub use types::{Package, PackageSet};
