//! Package to module classification.
//!
//! Every package is assigned to exactly one module bucket. The bucket decides
//! which node of the rendered graph the package's source files count towards.

use serde::Serialize;
use std::fmt;

use crate::parser::Package;

/// Name of the synthetic bucket holding standard library packages.
pub const STDLIB_MODULE: &str = "stdlib";

/// Suffix appended to packages that have no owning module.
pub const NO_MODULE_SUFFIX: &str = " (no module)";

/// The kind of module bucket a package was classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// The entry package itself, shown separately from its module.
    Root,
    /// Packages that look like they ship with the toolchain.
    Stdlib,
    /// Packages owned by an explicit module.
    Named,
    /// Packages outside of any module.
    Unowned,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Stdlib => write!(f, "stdlib"),
            Self::Named => write!(f, "named"),
            Self::Unowned => write!(f, "unowned"),
        }
    }
}

/// Identifier of a module node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId {
    name: String,
    kind: ModuleKind,
}

impl ModuleId {
    /// Creates a module identifier.
    pub fn new(name: impl Into<String>, kind: ModuleKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The standard library bucket.
    pub fn stdlib() -> Self {
        Self::new(STDLIB_MODULE, ModuleKind::Stdlib)
    }

    /// The display name of the module, also used as the graph node id.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bucket kind.
    pub fn kind(&self) -> ModuleKind {
        self.kind
    }

    /// Returns true for the standard library bucket.
    pub fn is_stdlib(&self) -> bool {
        self.kind == ModuleKind::Stdlib
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Classifies the root package: it always gets its own bucket.
pub fn classify_root(package: &Package) -> ModuleId {
    ModuleId::new(package.id.clone(), ModuleKind::Root)
}

/// Classifies any package other than the root.
///
/// A package whose first path segment has no `.` and which does not live
/// under the root module is assumed to be part of the standard library. This
/// is an approximation: a dotless first segment only usually means the
/// package ships with the toolchain.
///
/// # Example
///
/// ```
/// use modscope::graph::{classify, ModuleKind};
/// use modscope::parser::Package;
///
/// let fmt = Package::new("fmt", None);
/// assert_eq!(classify(&fmt, "example.com/app").kind(), ModuleKind::Stdlib);
///
/// let dep = Package::new("github.com/pkg/errors", Some("github.com/pkg/errors"));
/// assert_eq!(classify(&dep, "example.com/app").name(), "github.com/pkg/errors");
/// ```
pub fn classify(package: &Package, root_module: &str) -> ModuleId {
    let id = package.id.as_str();
    let first_segment = id.split('/').next().unwrap_or(id);

    if !id.starts_with(root_module) && !first_segment.contains('.') {
        ModuleId::stdlib()
    } else if let Some(module) = &package.module {
        ModuleId::new(module.clone(), ModuleKind::Named)
    } else {
        ModuleId::new(format!("{}{}", id, NO_MODULE_SUFFIX), ModuleKind::Unowned)
    }
}
