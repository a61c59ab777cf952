//! Paths into a parsed configuration tree.
//!
//! A [`ConfigPath`] is an ordered list of steps, each a string key (object
//! field) or an integer index (array position). Paths are pure data: they are
//! replayed against a root node only when a typed read or write happens,
//! never eagerly.

use std::fmt;

use serde_json::{Map, Value};

/// One step of a path: descend into an object field or an array element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Object field by key.
    Key(String),
    /// Array element by position.
    Index(usize),
}

/// An ordered sequence of steps, plus an optional origin label naming the
/// document the path starts from (used in diagnostics only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPath {
    origin: String,
    steps: Vec<PathStep>,
}

impl ConfigPath {
    /// The empty path, addressing the root node itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// An empty path labelled with the document it belongs to.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            steps: Vec::new(),
        }
    }

    /// The parent path extended by one key step.
    pub fn child_key(&self, key: &str) -> Self {
        let mut child = self.clone();
        child.steps.push(PathStep::Key(key.to_owned()));
        child
    }

    /// The parent path extended by one index step.
    pub fn child_index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.steps.push(PathStep::Index(index));
        child
    }

    /// Number of steps below the root.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Replay the steps against `root`.
    ///
    /// Returns `None` as soon as any intermediate step is absent or of the
    /// wrong kind; a `Some` holding a null node means the path is defined
    /// but empty.
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        let mut node = root;
        for step in &self.steps {
            node = match step {
                PathStep::Key(key) => node.get(key.as_str())?,
                PathStep::Index(index) => node.get(*index)?,
            };
        }
        Some(node)
    }

    /// Replay the steps against `root`, creating missing nodes along the way.
    ///
    /// A key step turns a non-object into an empty object; an index step
    /// turns a non-array into an empty array and grows it with nulls up to
    /// the index. Used by the single mutating operation
    /// ([`ConfigView::append`](super::ConfigView::append)).
    pub(crate) fn resolve_or_create<'v>(&self, root: &'v mut Value) -> &'v mut Value {
        let mut node = root;
        for step in &self.steps {
            node = match step {
                PathStep::Key(key) => {
                    if !node.is_object() {
                        *node = Value::Object(Map::new());
                    }
                    match node {
                        Value::Object(map) => map.entry(key.clone()).or_insert(Value::Null),
                        _ => unreachable!("object ensured above"),
                    }
                }
                PathStep::Index(index) => {
                    if !node.is_array() {
                        *node = Value::Array(Vec::new());
                    }
                    match node {
                        Value::Array(items) => {
                            if items.len() <= *index {
                                items.resize(*index + 1, Value::Null);
                            }
                            &mut items[*index]
                        }
                        _ => unreachable!("array ensured above"),
                    }
                }
            };
        }
        node
    }
}

impl fmt::Display for ConfigPath {
    /// Dotted keys with bracketed indices, e.g. `config.limits[2].max`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut written = !self.origin.is_empty();
        if written {
            f.write_str(&self.origin)?;
        }
        for step in &self.steps {
            match step {
                PathStep::Key(key) => {
                    if written {
                        write!(f, ".{key}")?;
                    } else {
                        f.write_str(key)?;
                    }
                }
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
            written = true;
        }
        Ok(())
    }
}
