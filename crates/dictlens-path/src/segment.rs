//! Concrete traversal paths.
//!
//! A [`FieldPath`] is the fully resolved position of one node inside a
//! compared structure. It renders as `$.a.b[0].c`: `$` is the root marker,
//! `.name` addresses a mapping key and `[n]` addresses a sequence index.

use std::fmt;
use std::str::FromStr;

use crate::error::{PatternError, Result};
use crate::pattern::{Pattern, PatternSegment};

/// The fixed root marker every path starts with.
pub const ROOT: &str = "$";

/// One step of a concrete path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key.
    Field(String),
    /// A sequence index.
    Index(usize),
}

impl PathSegment {
    /// The field name, if this is a field segment.
    pub fn as_field(&self) -> Option<&str> {
        match self {
            PathSegment::Field(name) => Some(name),
            PathSegment::Index(_) => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A concrete path from the root to one node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The root path `$`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from explicit segments.
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parse a rendered concrete path such as `$.a.b[0].c`.
    ///
    /// Wildcards and recursive descent are rejected: a concrete path is
    /// always fully resolved.
    ///
    /// ```
    /// use dictlens_path::{FieldPath, PathSegment};
    ///
    /// let path = FieldPath::parse("$.a[2]").unwrap();
    /// assert_eq!(
    ///     path.segments(),
    ///     &[PathSegment::Field("a".into()), PathSegment::Index(2)]
    /// );
    /// assert!(FieldPath::parse("$.a[*]").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self> {
        let pattern = Pattern::parse(path).map_err(|err| PatternError::InvalidConcretePath {
            path: path.to_string(),
            reason: match err {
                PatternError::Invalid { reason, .. } => reason,
                other => other.to_string(),
            },
        })?;

        let mut segments = Vec::with_capacity(pattern.segments().len());
        for segment in pattern.segments() {
            match segment {
                PatternSegment::Field(name) => segments.push(PathSegment::Field(name.clone())),
                PatternSegment::Index(index) => segments.push(PathSegment::Index(*index)),
                PatternSegment::AnyIndex | PatternSegment::Descendant(_) => {
                    return Err(PatternError::InvalidConcretePath {
                        path: path.to_string(),
                        reason: "concrete paths must not contain wildcards or recursive descent"
                            .into(),
                    });
                }
            }
        }
        Ok(Self { segments })
    }

    /// The segments after the root marker.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns `true` for the root path `$`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment's field name, if the final segment is a field.
    pub fn last_field(&self) -> Option<&str> {
        self.segments.last().and_then(PathSegment::as_field)
    }

    /// A new path extended by a mapping key.
    pub fn child_field(&self, name: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.push(PathSegment::Field(name.into()));
        child
    }

    /// A new path extended by a sequence index.
    pub fn child_index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.push(PathSegment::Index(index));
        child
    }

    /// Append a segment in place.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// Remove and return the final segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT)?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_dollar() {
        assert_eq!(FieldPath::root().to_string(), "$");
        assert!(FieldPath::root().is_root());
    }

    #[test]
    fn children_render_dotted_and_bracketed() {
        let path = FieldPath::root()
            .child_field("a")
            .child_field("b")
            .child_index(0)
            .child_field("c");
        assert_eq!(path.to_string(), "$.a.b[0].c");
        assert_eq!(path.segments().len(), 4);
    }

    #[test]
    fn push_and_pop_restore_parent() {
        let mut path = FieldPath::root().child_field("items");
        path.push(PathSegment::Index(3));
        assert_eq!(path.to_string(), "$.items[3]");
        assert_eq!(path.pop(), Some(PathSegment::Index(3)));
        assert_eq!(path.to_string(), "$.items");
    }

    #[test]
    fn last_field_ignores_index_segments() {
        let path = FieldPath::root().child_field("a").child_field("timestamp");
        assert_eq!(path.last_field(), Some("timestamp"));

        let indexed = path.child_index(1);
        assert_eq!(indexed.last_field(), None);
        assert_eq!(FieldPath::root().last_field(), None);
    }

    #[test]
    fn parse_reads_back_rendered_paths() {
        let path = FieldPath::parse("$.a.b[0].c").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Field("a".into()),
                PathSegment::Field("b".into()),
                PathSegment::Index(0),
                PathSegment::Field("c".into()),
            ]
        );
        assert_eq!(path.to_string(), "$.a.b[0].c");
    }

    #[test]
    fn parse_rejects_wildcards_and_descent() {
        assert!(matches!(
            FieldPath::parse("$.a[*]"),
            Err(PatternError::InvalidConcretePath { .. })
        ));
        assert!(FieldPath::parse("$..a").is_err());
    }

    #[test]
    fn parse_rejects_missing_root() {
        let err = FieldPath::parse("a.b").unwrap_err();
        assert_eq!(err.source_text(), "a.b");
        assert!(err.to_string().contains("invalid concrete path"));
    }
}
