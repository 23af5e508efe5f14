//! Normalized node paths

use std::fmt;

/// An absolute, slash-separated path to a node in the content tree.
///
/// Paths always start with `/`, never end with one (except the root
/// itself), and never contain empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    inner: String,
}

impl NodePath {
    /// Create a new NodePath, collapsing duplicate and trailing separators.
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            inner: format!("/{}", segments.join("/")),
        }
    }

    /// The root path `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Join this path with a (possibly multi-segment) relative path.
    pub fn join(&self, segment: &str) -> Self {
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            None
        } else {
            self.inner.rsplit('/').next()
        }
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.inner.matches('/').count()
        }
    }

    /// Check whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &NodePath) -> bool {
        if self.is_root() {
            return !other.is_root();
        }
        other.inner.len() > self.inner.len()
            && other.inner.starts_with(&self.inner)
            && other.inner.as_bytes()[self.inner.len()] == b'/'
    }

    /// Path of `self` relative to `ancestor`, without a leading slash.
    ///
    /// Returns `None` when `ancestor` is not an ancestor of `self`.
    pub fn relative_to(&self, ancestor: &NodePath) -> Option<&str> {
        if !ancestor.is_ancestor_of(self) {
            return None;
        }
        if ancestor.is_root() {
            Some(&self.inner[1..])
        } else {
            Some(&self.inner[ancestor.inner.len() + 1..])
        }
    }
}

impl Default for NodePath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}
