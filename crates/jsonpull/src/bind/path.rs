use core::fmt;

/// The location of a value being bound, relative to the document root.
///
/// Paths are linked through the call stack: every nested `from_tokens` call
/// borrows its parent's path, so building one never allocates. They are only
/// rendered (as `$`, `$.scenes[1].weight`, ...) when an error is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path<'a> {
    /// The top-level value, rendered as `$`.
    Root,
    /// A member of an object.
    Key {
        /// The containing object.
        parent: &'a Path<'a>,
        /// The member name.
        name: &'static str,
    },
    /// An element of an array.
    Index {
        /// The containing array.
        parent: &'a Path<'a>,
        /// Zero-based position of the element.
        index: usize,
    },
}

impl Path<'_> {
    /// The path of member `name` below `self`.
    #[must_use]
    pub const fn key(&self, name: &'static str) -> Path<'_> {
        Path::Key { parent: self, name }
    }

    /// The path of element `index` below `self`.
    #[must_use]
    pub const fn index(&self, index: usize) -> Path<'_> {
        Path::Index {
            parent: self,
            index,
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => f.write_str("$"),
            Path::Key { parent, name } => write!(f, "{parent}.{name}"),
            Path::Index { parent, index } => write!(f, "{parent}[{index}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn renders_nested_paths() {
        let root = Path::Root;
        let scenes = root.key("scenes");
        let second = scenes.index(1);
        let weight = second.key("weight");
        assert_eq!(root.to_string(), "$");
        assert_eq!(weight.to_string(), "$.scenes[1].weight");
    }
}
