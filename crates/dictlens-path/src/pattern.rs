//! Restricted path-query patterns.
//!
//! Grammar:
//!
//! ```text
//! pattern      := "$" segment*
//! segment      := "." field_name | ".." field_name | "[" index_expr "]"
//! index_expr   := non_negative_integer | "*"
//! ```
//!
//! Filters (`[?...]`), slices (`[a:b]`) and unions (`[a,b]`) are rejected
//! explicitly. Validation is purely syntactic and never looks at data.

use std::fmt;
use std::str::FromStr;

use crate::error::{PatternError, Result};
use crate::segment::{FieldPath, PathSegment, ROOT};

/// Characters that may not appear in a field name.
const FORBIDDEN_FIELD_CHARS: &[char] = &[']', '*', '?', ',', ':', '@', '(', ')', '\'', '"'];

/// One step of a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternSegment {
    /// `.name`: matches exactly this field.
    Field(String),
    /// `[n]`: matches exactly this index.
    Index(usize),
    /// `[*]`: matches any single index.
    AnyIndex,
    /// `..name`: matches this field at any depth.
    Descendant(String),
}

impl fmt::Display for PatternSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternSegment::Field(name) => write!(f, ".{name}"),
            PatternSegment::Index(index) => write!(f, "[{index}]"),
            PatternSegment::AnyIndex => f.write_str("[*]"),
            PatternSegment::Descendant(name) => write!(f, "..{name}"),
        }
    }
}

/// A validated path-query pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl Pattern {
    /// Parse and validate a pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use dictlens_path::Pattern;
    ///
    /// assert!(Pattern::parse("$.a.b[0].c").is_ok());
    /// assert!(Pattern::parse("$.a.b[*].c").is_ok());
    /// assert!(Pattern::parse("$..z").is_ok());
    /// assert!(Pattern::parse("a.b").is_err());
    /// assert!(Pattern::parse("$.items[0:3]").is_err());
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let segments = tokenize(pattern)?;
        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern text as supplied.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed segments after the root marker.
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Decide whether a concrete path is selected by this pattern.
    ///
    /// Plain segments must match in order and by kind. `[*]` matches any
    /// single index. `..name` matches `name` at any remaining depth; when it
    /// is the final segment, the path may continue past the matched field.
    pub fn matches_path(&self, path: &FieldPath) -> bool {
        match_segments(&self.segments, path.segments())
    }

    /// Like [`Pattern::matches_path`] for a rendered concrete path.
    ///
    /// Returns `false` when `concrete_path` cannot be parsed.
    pub fn matches_str(&self, concrete_path: &str) -> bool {
        FieldPath::parse(concrete_path)
            .map(|path| self.matches_path(&path))
            .unwrap_or(false)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        &self.source
    }
}

/// Validate a pattern, returning `Ok(())` if it conforms to the grammar.
///
/// ```
/// use dictlens_path::validate_pattern;
///
/// assert!(validate_pattern("$.a.b.c").is_ok());
/// assert!(validate_pattern("user.age").is_err());
/// assert!(validate_pattern("$.items[?(@.price > 10)]").is_err());
/// assert!(validate_pattern("$.items[0,2,5]").is_err());
/// ```
pub fn validate_pattern(pattern: &str) -> Result<()> {
    tokenize(pattern).map(|_| ())
}

/// Decide whether `concrete_path` is selected by `pattern`.
///
/// Both strings are parsed; an unparseable input never matches. Callers
/// that match repeatedly should parse once with [`Pattern::parse`].
pub fn matches(pattern: &str, concrete_path: &str) -> bool {
    match Pattern::parse(pattern) {
        Ok(pattern) => pattern.matches_str(concrete_path),
        Err(_) => false,
    }
}

/// Field-name ignore rule: exact equality with the path's final field.
pub fn matches_field_name(field: &str, path: &FieldPath) -> bool {
    path.last_field() == Some(field)
}

fn tokenize(pattern: &str) -> Result<Vec<PatternSegment>> {
    let invalid = |reason: String| PatternError::Invalid {
        pattern: pattern.to_string(),
        reason,
    };

    let mut rest = pattern
        .strip_prefix(ROOT)
        .ok_or_else(|| invalid(format!("must start with '{ROOT}'")))?;
    let mut segments = Vec::new();

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("..") {
            let (name, tail) = split_field_name(after);
            check_field_name(name).map_err(|reason| {
                invalid(format!("recursive descent needs a field name: {reason}"))
            })?;
            segments.push(PatternSegment::Descendant(name.to_string()));
            rest = tail;
        } else if let Some(after) = rest.strip_prefix('.') {
            let (name, tail) = split_field_name(after);
            check_field_name(name).map_err(invalid)?;
            segments.push(PatternSegment::Field(name.to_string()));
            rest = tail;
        } else if let Some(after) = rest.strip_prefix('[') {
            let close = after
                .find(']')
                .ok_or_else(|| invalid("unterminated '['".into()))?;
            segments.push(parse_index_expr(&after[..close]).map_err(invalid)?);
            rest = &after[close + 1..];
        } else {
            let ch = rest.chars().next().unwrap_or_default();
            return Err(invalid(format!("expected '.', '..' or '[' but found {ch:?}")));
        }
    }

    Ok(segments)
}

/// Split at the next `.` or `[`.
fn split_field_name(s: &str) -> (&str, &str) {
    let end = s.find(['.', '[']).unwrap_or(s.len());
    s.split_at(end)
}

fn check_field_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("empty field name".into());
    }
    let forbidden = name.chars().find(|ch| FORBIDDEN_FIELD_CHARS.contains(ch));
    if let Some(ch) = forbidden {
        return Err(format!("field name {name:?} contains forbidden character {ch:?}"));
    }
    Ok(())
}

fn parse_index_expr(expr: &str) -> std::result::Result<PatternSegment, String> {
    if expr.is_empty() {
        return Err("empty index expression '[]'".into());
    }
    if expr.starts_with('?') {
        return Err(format!("filter expressions are not supported: [{expr}]"));
    }
    if expr.contains(':') {
        return Err(format!("slice expressions are not supported: [{expr}]"));
    }
    if expr.contains(',') {
        return Err(format!("union expressions are not supported: [{expr}]"));
    }
    if expr.contains(char::is_whitespace) {
        return Err(format!("whitespace is not allowed in index expressions: [{expr}]"));
    }
    if expr == "*" {
        return Ok(PatternSegment::AnyIndex);
    }
    if expr.bytes().all(|b| b.is_ascii_digit()) {
        return expr
            .parse::<usize>()
            .map(PatternSegment::Index)
            .map_err(|_| format!("index out of range: [{expr}]"));
    }
    if expr.starts_with('\'') || expr.starts_with('"') {
        return Err(format!("quoted member names are not supported: [{expr}]"));
    }
    Err(format!("index must be a non-negative integer or '*': [{expr}]"))
}

fn match_segments(pattern: &[PatternSegment], path: &[PathSegment]) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return path.is_empty();
    };

    if let PatternSegment::Descendant(name) = head {
        // Suffix scan: try every depth at which `name` occurs.
        return path.iter().enumerate().any(|(i, segment)| {
            segment.as_field() == Some(name.as_str())
                && (rest.is_empty() || match_segments(rest, &path[i + 1..]))
        });
    }

    match path.split_first() {
        Some((segment, tail)) => segment_matches(head, segment) && match_segments(rest, tail),
        None => false,
    }
}

fn segment_matches(pattern: &PatternSegment, segment: &PathSegment) -> bool {
    match (pattern, segment) {
        (PatternSegment::Field(expected), PathSegment::Field(actual)) => expected == actual,
        (PatternSegment::Index(expected), PathSegment::Index(actual)) => expected == actual,
        (PatternSegment::AnyIndex, PathSegment::Index(_)) => true,
        _ => false,
    }
}
