//! Location of a node inside a value tree, rendered in dot/bracket notation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

// -----------------------------------------------------------------------------
// Segment

/// One step from a parent node to a child node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A class field or struct-variant field, by representation name.
    Field(String),
    /// A position in a sequence, tuple or array.
    Index(usize),
    /// A key of a string-keyed map.
    Key(String),
}

// -----------------------------------------------------------------------------
// FieldPath

/// A path from the root of a value tree.
///
/// # Examples
///
/// ```
/// use conform_reflect::path::{FieldPath, Segment};
///
/// let mut path = FieldPath::root();
/// path.push(Segment::Field("servers".into()));
/// path.push(Segment::Index(2));
/// path.push(Segment::Field("ports".into()));
/// path.push(Segment::Key("http".into()));
///
/// assert_eq!(path.to_string(), r#"servers[2].ports["http"]"#);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub(crate) fn truncate(&mut self, len: usize) {
        self.segments.truncate(len);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => f.write_str(name)?,
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
                Segment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldPath, Segment};

    #[test]
    fn root_and_leading_index() {
        let mut path = FieldPath::root();
        assert_eq!(path.to_string(), "<root>");
        path.push(Segment::Index(0));
        path.push(Segment::Field("name".into()));
        assert_eq!(path.to_string(), "[0].name");
        path.truncate(1);
        assert_eq!(path.to_string(), "[0]");
    }
}
