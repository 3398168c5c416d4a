//! modscope - Go module dependency graphs sized by lines of code
//!
//! This crate loads the transitive package graph of a Go package, groups the
//! packages into modules, counts each module's code lines in parallel, and
//! renders the module graph through Graphviz with node sizes proportional to
//! code size.

pub mod config;
pub mod export;
pub mod graph;
pub mod loc;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod visual;
