//! Visual encoding for module nodes.
//!
//! Node size follows the square root of a module's line count, labels carry
//! the wrapped module name plus a KLOC figure, and colors are picked per
//! author.
//!
//! # Example
//!
//! ```
//! use modscope::graph::ModuleId;
//! use modscope::visual::{encode, VisualConfig};
//!
//! let attrs = encode(&ModuleId::stdlib(), 4_000, 1_000, &VisualConfig::default());
//! assert!((attrs.size - 0.66).abs() < 1e-12);
//! assert_eq!(attrs.label, "stdlib\n4.0K LOC");
//! assert_eq!(attrs.color.fill, "#CCCCCC");
//! ```

pub mod color;
pub mod encode;
pub mod label;

pub use color::{
    author_of, default_author_colors, hashed_color, node_color, HashedColorConfig, NodeColor,
};
pub use encode::{encode, encode_all, node_size, VisualAttributes, VisualConfig};
pub use label::{format_kloc, node_label, wrap_module_name};
