//! Node geometry extraction from laid out DOT.
//!
//! After layout every node statement carries `pos="x,y"`, `width` and
//! `height`. This module tokenizes the DOT text just far enough to find node
//! statements and read those three attributes.

use std::collections::HashMap;

use super::RenderError;

/// Position and size of one laid out node.
///
/// `x` and `y` are in points, `width` and `height` in inches, as reported by
/// the layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGeometry {
    /// Node identifier
    pub name: String,
    /// Center x coordinate
    pub x: f64,
    /// Center y coordinate
    pub y: f64,
    /// Node width
    pub width: f64,
    /// Node height
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Id(String),
    EdgeOp,
    Punct(char),
}

struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: &str) -> RenderError {
        RenderError::Syntax {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn at_line_start(&self) -> bool {
        self.src[..self.pos]
            .chars()
            .rev()
            .take_while(|&c| c != '\n')
            .all(char::is_whitespace)
    }

    fn skip_until(&mut self, end: &str) {
        match self.src[self.pos..].find(end) {
            Some(offset) => self.pos += offset + end.len(),
            None => self.pos = self.src.len(),
        }
    }

    fn quoted(&mut self) -> Result<String, RenderError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    // Line continuation
                    Some('\n') => {}
                    Some('\r') => {
                        if self.peek() == Some('\n') {
                            self.bump();
                        }
                    }
                    Some('"') => value.push('"'),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn html(&mut self) -> Result<String, RenderError> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated HTML string")),
                Some('<') => depth += 1,
                Some('>') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.src[start..self.pos].to_string());
                    }
                }
                Some(_) => {}
            }
        }
    }

    fn bare(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let is_edge_op = c == '-' && matches!(self.peek_second(), Some('>' | '-'));
            if is_edge_op || !(c.is_alphanumeric() || matches!(c, '_' | '.' | '-')) {
                break;
            }
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn next_token(&mut self) -> Result<Option<Token>, RenderError> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(None);
            };
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '#' if self.at_line_start() => self.skip_until("\n"),
                '/' if self.peek_second() == Some('/') => self.skip_until("\n"),
                '/' if self.peek_second() == Some('*') => {
                    self.pos += 2;
                    self.skip_until("*/");
                }
                '"' => {
                    self.bump();
                    return self.quoted().map(|s| Some(Token::Id(s)));
                }
                '<' => return self.html().map(|s| Some(Token::Id(s))),
                '-' if matches!(self.peek_second(), Some('>' | '-')) => {
                    self.pos += 2;
                    return Ok(Some(Token::EdgeOp));
                }
                '{' | '}' | '[' | ']' | '=' | ';' | ',' | ':' => {
                    self.bump();
                    return Ok(Some(Token::Punct(c)));
                }
                _ => {
                    let id = self.bare();
                    if id.is_empty() {
                        return Err(self.error(&format!("unexpected character '{}'", c)));
                    }
                    return Ok(Some(Token::Id(id)));
                }
            }
        }
    }
}

fn tokenize(src: &str) -> Result<Vec<Token>, RenderError> {
    let mut tokenizer = Tokenizer::new(src);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

fn is_keyword(id: &str) -> bool {
    matches!(
        id.to_ascii_lowercase().as_str(),
        "strict" | "graph" | "digraph" | "subgraph" | "node" | "edge"
    )
}

/// Reads `[a=b, c=d; ...]` lists starting at `tokens[i]`, returning the
/// attributes and the index after the last list.
fn attr_lists(tokens: &[Token], mut i: usize) -> (HashMap<String, String>, usize) {
    let mut attrs = HashMap::new();
    while tokens.get(i) == Some(&Token::Punct('[')) {
        i += 1;
        while let Some(token) = tokens.get(i) {
            match token {
                Token::Punct(']') => {
                    i += 1;
                    break;
                }
                Token::Id(key) if tokens.get(i + 1) == Some(&Token::Punct('=')) => {
                    if let Some(Token::Id(value)) = tokens.get(i + 2) {
                        attrs.insert(key.clone(), value.clone());
                        i += 3;
                    } else {
                        i += 2;
                    }
                }
                _ => i += 1,
            }
        }
    }
    (attrs, i)
}

/// Skips an optional `:port[:compass]` suffix.
fn skip_port(tokens: &[Token], mut i: usize) -> usize {
    while tokens.get(i) == Some(&Token::Punct(':')) {
        i += 2;
    }
    i
}

fn number(node: &str, key: &str, value: &str) -> Result<f64, RenderError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RenderError::MalformedGeometry {
            node: node.to_string(),
            reason: format!("{} is not a number: {:?}", key, value),
        })
}

fn required<'a>(
    node: &str,
    attrs: &'a HashMap<String, String>,
    key: &str,
) -> Result<&'a str, RenderError> {
    attrs
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| RenderError::MalformedGeometry {
            node: node.to_string(),
            reason: format!("missing {}", key),
        })
}

fn node_geometry(
    name: &str,
    attrs: &HashMap<String, String>,
) -> Result<NodeGeometry, RenderError> {
    let pos = required(name, attrs, "pos")?;
    let components: Vec<&str> = pos.trim_end_matches('!').split(',').collect();
    let [x, y] = components.as_slice() else {
        return Err(RenderError::MalformedGeometry {
            node: name.to_string(),
            reason: format!("pos must have two components, got {:?}", pos),
        });
    };

    Ok(NodeGeometry {
        name: name.to_string(),
        x: number(name, "pos", x)?,
        y: number(name, "pos", y)?,
        width: number(name, "width", required(name, attrs, "width")?)?,
        height: number(name, "height", required(name, attrs, "height")?)?,
    })
}

/// Extracts the geometry of every node statement in laid out DOT text.
///
/// Nodes that only appear in edge statements are not reported.
///
/// # Errors
///
/// Returns [`RenderError::Syntax`] for text that cannot be tokenized and
/// [`RenderError::MalformedGeometry`] when a node statement lacks `pos`,
/// `width` or `height`, has a non-numeric value, or has a `pos` that is not
/// exactly two components.
///
/// # Example
///
/// ```
/// use modscope::render::parse_geometry;
///
/// let dot = r#"digraph modules {
///     graph [bb="0,0,62,36"];
///     "stdlib" [height=0.5, pos="31,18", width=0.86];
/// }"#;
///
/// let nodes = parse_geometry(dot).unwrap();
/// assert_eq!(nodes.len(), 1);
/// assert_eq!(nodes[0].name, "stdlib");
/// assert_eq!((nodes[0].x, nodes[0].y), (31.0, 18.0));
/// ```
pub fn parse_geometry(dot: &str) -> Result<Vec<NodeGeometry>, RenderError> {
    let tokens = tokenize(dot)?;
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let Token::Id(id) = &tokens[i] else {
            i += 1;
            continue;
        };

        if is_keyword(id) {
            i += 1;
            match tokens.get(i) {
                Some(Token::Punct('[')) => i = attr_lists(&tokens, i).1,
                // Graph or subgraph name
                Some(Token::Id(next)) if !is_keyword(next) => i += 1,
                _ => {}
            }
            continue;
        }

        // Graph attribute `a=b`
        if tokens.get(i + 1) == Some(&Token::Punct('=')) {
            i += 3;
            continue;
        }

        let mut next = skip_port(&tokens, i + 1);
        if tokens.get(next) == Some(&Token::EdgeOp) {
            while tokens.get(next) == Some(&Token::EdgeOp) {
                next = skip_port(&tokens, next + 2);
            }
            i = attr_lists(&tokens, next).1;
            continue;
        }

        let (attrs, after) = attr_lists(&tokens, next);
        nodes.push(node_geometry(id, &attrs)?);
        i = after;
    }

    Ok(nodes)
}
