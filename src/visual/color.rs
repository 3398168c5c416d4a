//! Deterministic node colors.
//!
//! Modules are colored by author, the first path segment after an optional
//! known hosting prefix. Curated authors get hand-picked colors; everyone
//! else gets a light color derived from the 32-bit FNV-1a hash of the
//! author, so the same author always maps to the same color.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use core::hash::Hasher as _;
use hash32::{FnvHasher, Hasher as _};

/// Fill and border color of a node, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeColor {
    /// Background color
    pub fill: String,
    /// Outline color
    pub border: String,
}

impl NodeColor {
    /// Creates a node color.
    pub fn new(fill: impl Into<String>, border: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            border: border.into(),
        }
    }
}

/// Parameters for deriving colors of authors without a curated entry.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HashedColorConfig {
    /// Byte hashed in front of the author name
    pub seed: u8,
    /// Share of the raw hash color kept when blending toward white
    pub squeeze: f64,
    /// Added to each fill channel to get the border channel, wrapping
    pub border_offset: i32,
}

impl Default for HashedColorConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            squeeze: 0.33,
            border_offset: -84,
        }
    }
}

/// The built-in curated author colors.
pub fn default_author_colors() -> BTreeMap<String, NodeColor> {
    [
        ("aws", NodeColor::new("#FFBE5E", "#FF9900")),
        ("golang.org", NodeColor::new("#A2EAEF", "#6AD6E3")),
        ("stdlib", NodeColor::new("#CCCCCC", "#AAAAAA")),
    ]
    .into_iter()
    .map(|(author, color)| (author.to_string(), color))
    .collect()
}

/// Extracts the author part of a module name.
///
/// # Example
///
/// ```
/// use modscope::visual::author_of;
///
/// let hosts = vec!["github.com".to_string()];
/// assert_eq!(author_of("github.com/aws/aws-sdk-go", &hosts), "aws");
/// assert_eq!(author_of("golang.org/x/tools", &hosts), "golang.org");
/// assert_eq!(author_of("stdlib", &hosts), "stdlib");
/// ```
pub fn author_of<'a>(module: &'a str, known_hosts: &[String]) -> &'a str {
    let rest = known_hosts
        .iter()
        .find_map(|host| {
            module
                .strip_prefix(host.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
        })
        .unwrap_or(module);

    rest.split('/').next().unwrap_or(rest)
}

/// Derives a light fill color and a darker border from an author name.
pub fn hashed_color(author: &str, config: &HashedColorConfig) -> NodeColor {
    let mut hasher = FnvHasher::default();
    hasher.write(&[config.seed]);
    hasher.write(author.as_bytes());
    let hash = hasher.finish32();

    let fill_base = (1.0 - config.squeeze) * 255.0;
    let blend = |channel: u32| (fill_base + config.squeeze * (channel & 0xFF) as f64) as u8;
    let fill = [blend(hash), blend(hash >> 8), blend(hash >> 16)];
    let border = fill.map(|channel| (i32::from(channel) + config.border_offset) as u8);

    NodeColor::new(hex(fill), hex(border))
}

/// Picks the color of a module node.
pub fn node_color(
    module: &str,
    known_hosts: &[String],
    author_colors: &BTreeMap<String, NodeColor>,
    hashing: &HashedColorConfig,
) -> NodeColor {
    let author = author_of(module, known_hosts);
    match author_colors.get(author) {
        Some(color) => color.clone(),
        None => hashed_color(author, hashing),
    }
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
