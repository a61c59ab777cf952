//! Lazy, typed views into a configuration document.
//!
//! A [`ConfigDoc`] owns the parsed tree; a [`ConfigView`] is a cheap handle
//! carrying a [`ConfigPath`] into it. Navigation never touches the tree, so
//! a view may point at a node that does not exist; only a typed read or an
//! [`append`](ConfigView::append) walks the path.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use thiserror::Error;

use super::path::ConfigPath;
use crate::types::decimal::Decimal;
use crate::types::time::{Microseconds, Milliseconds, Nanoseconds, Seconds};

/// Errors produced by typed configuration reads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The path does not resolve to any node and no default was supplied.
    #[error("undefined config value at '{path}'")]
    UndefinedValue { path: String },

    /// The node exists but cannot be coerced to the requested type.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Shape of a configuration node, for introspection and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Real,
    String,
    Array,
    Object,
}

impl ValueKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(number) if number.is_f64() => ValueKind::Real,
            Value::Number(_) => ValueKind::Int,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Lowercase name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Real => "real",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn mismatch(path: &ConfigPath, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        path: path.to_string(),
        expected,
        found: ValueKind::of(found).name(),
    }
}

/// Empty in the container sense: null, `[]` or `{}`. Scalars are never
/// empty, including `""` and `0`.
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Conversion from a configuration node into a typed value.
///
/// Implementations coerce the usual JSON spellings (e.g. [`Decimal`] accepts
/// ints, reals and numeric strings) and report anything else as a
/// [`ConfigError::TypeMismatch`] naming the full path.
pub trait FromConfig: Sized {
    /// Human-readable name of the requested type, used in diagnostics.
    const EXPECTED: &'static str;

    fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError>;
}

impl FromConfig for bool {
    const EXPECTED: &'static str = "bool";

    fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
        node.as_bool().ok_or_else(|| mismatch(path, Self::EXPECTED, node))
    }
}

impl FromConfig for String {
    const EXPECTED: &'static str = "string";

    fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
        node.as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(path, Self::EXPECTED, node))
    }
}

macro_rules! impl_from_config_signed {
    ($($t:ty),*) => {$(
        impl FromConfig for $t {
            const EXPECTED: &'static str = stringify!($t);

            fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
                node.as_i64()
                    .and_then(|wide| <$t>::try_from(wide).ok())
                    .ok_or_else(|| mismatch(path, Self::EXPECTED, node))
            }
        }
    )*};
}

macro_rules! impl_from_config_unsigned {
    ($($t:ty),*) => {$(
        impl FromConfig for $t {
            const EXPECTED: &'static str = stringify!($t);

            fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
                node.as_u64()
                    .and_then(|wide| <$t>::try_from(wide).ok())
                    .ok_or_else(|| mismatch(path, Self::EXPECTED, node))
            }
        }
    )*};
}

impl_from_config_signed!(i8, i16, i32, i64);
impl_from_config_unsigned!(u8, u16, u32, u64, usize);

impl FromConfig for f64 {
    const EXPECTED: &'static str = "real";

    fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
        node.as_f64().ok_or_else(|| mismatch(path, Self::EXPECTED, node))
    }
}

impl FromConfig for Decimal {
    const EXPECTED: &'static str = "decimal";

    /// Accepts an integer, a real, or a string holding a real
    /// (e.g. `"0.0001"`, useful when the author wants to be explicit about
    /// an exact value).
    fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
        if let Some(int) = node.as_i64() {
            return Ok(Decimal::from(int));
        }
        if let Some(real) = node.as_f64() {
            return Ok(Decimal::from_f64(real));
        }
        if let Some(text) = node.as_str() {
            if let Ok(real) = text.trim().parse::<f64>() {
                return Ok(Decimal::from_f64(real));
            }
        }
        Err(mismatch(path, Self::EXPECTED, node))
    }
}

macro_rules! impl_from_config_duration {
    ($($t:ty => $name:literal),*) => {$(
        impl FromConfig for $t {
            const EXPECTED: &'static str = $name;

            fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
                node.as_i64()
                    .map(<$t>::new)
                    .ok_or_else(|| mismatch(path, Self::EXPECTED, node))
            }
        }
    )*};
}

impl_from_config_duration!(
    Seconds => "seconds",
    Milliseconds => "milliseconds",
    Microseconds => "microseconds",
    Nanoseconds => "nanoseconds"
);

impl<T: FromConfig> FromConfig for Vec<T> {
    const EXPECTED: &'static str = "array";

    /// A null node reads as an empty vector; a defined-but-empty array too.
    fn from_node(node: &Value, path: &ConfigPath) -> Result<Self, ConfigError> {
        match node {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| T::from_node(item, &path.child_index(index)))
                .collect(),
            other => Err(mismatch(path, Self::EXPECTED, other)),
        }
    }
}

/// An owned, parsed configuration document.
///
/// The tree lives behind a [`RefCell`] so that many read-only views can
/// coexist with the occasional [`append`](ConfigView::append); the SDK is
/// single-threaded per strategy, matching the callback model.
#[derive(Debug, Default)]
pub struct ConfigDoc {
    root: RefCell<Value>,
}

impl ConfigDoc {
    /// An empty document: the root is null until something is appended.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built tree.
    pub fn from_value(root: Value) -> Self {
        Self {
            root: RefCell::new(root),
        }
    }

    /// Parse a document from JSON text.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let root = serde_json::from_str(text).context("failed to parse config document")?;
        Ok(Self::from_value(root))
    }

    /// Load and parse a document from a file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// View of the root node.
    pub fn root(&self) -> ConfigView<'_> {
        ConfigView {
            path: ConfigPath::root(),
            doc: self,
        }
    }

    /// Clone of the current tree.
    pub fn to_value(&self) -> Value {
        self.root.borrow().clone()
    }
}

/// A lazy handle to one node of a [`ConfigDoc`].
///
/// Copying a view or navigating deeper only grows the path; the tree is
/// consulted when the value is actually read.
///
/// # Examples
///
/// ```
/// use arena_sdk::config::ConfigDoc;
///
/// let doc = ConfigDoc::parse(r#"{"limits": {"lot": 5}}"#).unwrap();
/// let lot: i32 = doc.root().at("limits").at("lot").read().unwrap();
/// assert_eq!(lot, 5);
/// ```
#[derive(Clone)]
pub struct ConfigView<'a> {
    path: ConfigPath,
    doc: &'a ConfigDoc,
}

impl<'a> ConfigView<'a> {
    /// Descend into an object field. Never fails: the path may point
    /// nowhere until it is read.
    pub fn at(&self, key: &str) -> ConfigView<'a> {
        ConfigView {
            path: self.path.child_key(key),
            doc: self.doc,
        }
    }

    /// Descend into an array element.
    pub fn at_index(&self, index: usize) -> ConfigView<'a> {
        ConfigView {
            path: self.path.child_index(index),
            doc: self.doc,
        }
    }

    /// The path this view addresses.
    pub fn path(&self) -> &ConfigPath {
        &self.path
    }

    fn with_node<R>(&self, f: impl FnOnce(Option<&Value>) -> R) -> R {
        let root = self.doc.root.borrow();
        f(self.path.resolve(&root))
    }

    /// Whether the path resolves to a node at all. A null node is defined.
    pub fn is_defined(&self) -> bool {
        self.with_node(|node| node.is_some())
    }

    /// Whether the node is missing, null, or an empty container. Scalars
    /// (including `""` and `0`) are never empty.
    pub fn is_empty(&self) -> bool {
        self.with_node(|node| node.map_or(true, is_empty_value))
    }

    /// Shape of the node; [`ValueKind::Null`] when undefined.
    pub fn kind(&self) -> ValueKind {
        self.with_node(|node| node.map_or(ValueKind::Null, ValueKind::of))
    }

    /// Whether the node is an object containing `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.with_node(|node| {
            node.and_then(Value::as_object)
                .is_some_and(|map| map.contains_key(key))
        })
    }

    /// Element count of an array or object node; zero for anything else.
    pub fn size(&self) -> usize {
        self.with_node(|node| match node {
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(map)) => map.len(),
            _ => 0,
        })
    }

    /// Read the node as `T`.
    ///
    /// An undefined path is an error; reading an empty node logs a warning
    /// before the coercion is attempted, since that usually means a config
    /// key was left half-written.
    pub fn read<T: FromConfig>(&self) -> Result<T, ConfigError> {
        self.with_node(|node| match node {
            None => Err(ConfigError::UndefinedValue {
                path: self.path.to_string(),
            }),
            Some(value) => {
                if is_empty_value(value) {
                    tracing::warn!(path = %self.path, "reading empty config value");
                }
                T::from_node(value, &self.path)
            }
        })
    }

    /// Read the node as `T`, falling back to `default` when the path is
    /// undefined. The fallback is logged so a deployment can be audited for
    /// silently-defaulted settings.
    pub fn read_or<T: FromConfig + fmt::Debug>(&self, default: T) -> Result<T, ConfigError> {
        self.with_node(|node| match node {
            None => {
                tracing::info!(path = %self.path, default = ?default, "using default config value");
                Ok(default)
            }
            Some(value) => {
                if is_empty_value(value) {
                    tracing::warn!(path = %self.path, "reading empty config value");
                }
                T::from_node(value, &self.path)
            }
        })
    }

    /// Append `value` to the node, creating the path if needed.
    ///
    /// Anything that is not already an array (missing, null, scalar,
    /// object) is replaced by an empty array first, then `value` lands at
    /// the next index.
    pub fn append(&self, value: impl Into<Value>) {
        let mut root = self.doc.root.borrow_mut();
        let node = self.path.resolve_or_create(&mut root);
        if !node.is_array() {
            *node = Value::Array(Vec::new());
        }
        if let Value::Array(items) = node {
            items.push(value.into());
        }
    }

    /// Pretty-printed JSON rendering of the subtree; `"null"` when
    /// undefined.
    pub fn to_styled_string(&self) -> String {
        self.with_node(|node| {
            // Serializing a Value cannot fail.
            serde_json::to_string_pretty(node.unwrap_or(&Value::Null)).unwrap_or_default()
        })
    }

    /// Single-line JSON rendering of the subtree; `"null"` when undefined.
    pub fn to_compact_string(&self) -> String {
        self.with_node(|node| {
            serde_json::to_string(node.unwrap_or(&Value::Null)).unwrap_or_default()
        })
    }
}

impl fmt::Debug for ConfigView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigView")
            .field("path", &self.path.to_string())
            .field("defined", &self.is_defined())
            .finish()
    }
}

impl From<Decimal> for Value {
    /// Written as a real number, so a round trip through a config file
    /// reads back through the usual numeric coercion.
    fn from(value: Decimal) -> Self {
        serde_json::Number::from_f64(value.to_f64()).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::sync::{Arc, Mutex};

    use tracing::level_filters::LevelFilter;
    use tracing::Level;
    use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
    use tracing_subscriber::registry::Registry;
    use tracing_subscriber::Layer;

    #[derive(Clone, Default)]
    struct RecordingLayer {
        levels: Arc<Mutex<Vec<Level>>>,
    }

    impl<S: tracing::Subscriber> Layer<S> for RecordingLayer {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
            self.levels.lock().unwrap().push(*event.metadata().level());
        }
    }

    /// Run `f` with a subscriber that records event levels.
    fn record_events<R>(f: impl FnOnce() -> R) -> (R, Vec<Level>) {
        let layer = RecordingLayer::default();
        let levels = Arc::clone(&layer.levels);
        let subscriber = Registry::default().with(layer.with_filter(LevelFilter::TRACE));
        let result = tracing::subscriber::with_default(subscriber, f);
        let recorded = levels.lock().unwrap().clone();
        (result, recorded)
    }

    fn sample_doc() -> ConfigDoc {
        ConfigDoc::parse(
            r#"{
                "lot": 5,
                "ratio": 0.25,
                "name": "mm-basic",
                "enabled": true,
                "tick": "0.0001",
                "levels": [1, 2, 3],
                "empty_list": [],
                "nothing": null,
                "nested": {"timeout_ms": 250}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_navigation_is_lazy() {
        let doc = sample_doc();
        let view = doc.root().at("no").at("such").at_index(9).at("path");
        assert!(!view.is_defined());
        assert!(view.is_empty());
        // The tree itself is untouched.
        assert_eq!(doc.to_value(), sample_doc().to_value());
    }

    #[test]
    fn test_read_scalars() {
        let doc = sample_doc();
        let root = doc.root();
        assert_eq!(root.at("lot").read::<i32>(), Ok(5));
        assert_eq!(root.at("lot").read::<u64>(), Ok(5));
        assert_eq!(root.at("ratio").read::<f64>(), Ok(0.25));
        assert_eq!(root.at("name").read::<String>(), Ok("mm-basic".to_owned()));
        assert_eq!(root.at("enabled").read::<bool>(), Ok(true));
        assert_eq!(
            root.at("nested").at("timeout_ms").read::<Milliseconds>(),
            Ok(Milliseconds::new(250))
        );
    }

    #[test]
    fn test_read_decimal_coercions() {
        let doc = sample_doc();
        let root = doc.root();
        assert_eq!(root.at("lot").read::<Decimal>(), Ok(Decimal::from(5)));
        assert_eq!(
            root.at("ratio").read::<Decimal>(),
            Ok(Decimal::from_f64(0.25))
        );
        assert_eq!(
            root.at("tick").read::<Decimal>(),
            Ok(Decimal::from_f64(0.0001))
        );
    }

    #[test]
    fn test_read_vectors() {
        let doc = sample_doc();
        assert_eq!(doc.root().at("levels").read::<Vec<i32>>(), Ok(vec![1, 2, 3]));
        assert_eq!(doc.root().at("empty_list").read::<Vec<i32>>(), Ok(vec![]));
        // A null node coerces to an empty vector too.
        assert_eq!(doc.root().at("nothing").read::<Vec<i32>>(), Ok(vec![]));
    }

    #[test]
    fn test_read_undefined_fails() {
        let doc = sample_doc();
        let err = doc.root().at("missing").read::<i32>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::UndefinedValue {
                path: "missing".to_owned()
            }
        );
    }

    #[test]
    fn test_read_type_mismatch_names_path_and_kinds() {
        let doc = sample_doc();
        let err = doc.root().at("name").read::<i32>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::TypeMismatch {
                path: "name".to_owned(),
                expected: "i32",
                found: "string"
            }
        );
        let err = doc.root().at("levels").at_index(0).read::<String>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::TypeMismatch {
                path: "levels[0]".to_owned(),
                expected: "string",
                found: "int"
            }
        );
    }

    #[test]
    fn test_read_or_logs_exactly_one_default_notice() {
        let doc = sample_doc();
        let (value, levels) = record_events(|| doc.root().at("missing").read_or(42));
        assert_eq!(value, Ok(42));
        assert_eq!(levels, vec![Level::INFO]);
    }

    #[test]
    fn test_read_or_prefers_present_value_silently() {
        let doc = sample_doc();
        let (value, levels) = record_events(|| doc.root().at("lot").read_or(42));
        assert_eq!(value, Ok(5));
        assert!(levels.is_empty());
    }

    #[test]
    fn test_reading_empty_node_warns() {
        let doc = sample_doc();
        let (value, levels) = record_events(|| doc.root().at("nothing").read::<Vec<i32>>());
        assert_eq!(value, Ok(vec![]));
        assert_eq!(levels, vec![Level::WARN]);
    }

    #[test]
    fn test_null_is_defined_but_empty() {
        let doc = sample_doc();
        let view = doc.root().at("nothing");
        assert!(view.is_defined());
        assert!(view.is_empty());
        assert_eq!(view.kind(), ValueKind::Null);
    }

    #[test]
    fn test_scalars_are_never_empty() {
        let doc = sample_doc();
        assert!(!doc.root().at("lot").is_empty());
        assert!(!doc.root().at("enabled").is_empty());
        let zero = ConfigDoc::parse(r#"{"n": 0, "s": ""}"#).unwrap();
        assert!(!zero.root().at("n").is_empty());
        assert!(!zero.root().at("s").is_empty());
    }

    #[test]
    fn test_introspection() {
        let doc = sample_doc();
        let root = doc.root();
        assert_eq!(root.at("lot").kind(), ValueKind::Int);
        assert_eq!(root.at("ratio").kind(), ValueKind::Real);
        assert_eq!(root.at("levels").kind(), ValueKind::Array);
        assert_eq!(root.at("nested").kind(), ValueKind::Object);
        assert!(root.at("nested").has_key("timeout_ms"));
        assert!(!root.at("nested").has_key("absent"));
        assert_eq!(root.at("levels").size(), 3);
        assert_eq!(root.at("nested").size(), 1);
        assert_eq!(root.at("lot").size(), 0);
    }

    #[test]
    fn test_append_creates_missing_path() {
        let doc = ConfigDoc::new();
        let marks = doc.root().at("report").at("marks");
        marks.append(Decimal::from_f64(1.5));
        marks.append(Decimal::from(2));
        marks.append(Decimal::from_f64(-2.5));
        assert_eq!(
            marks.read::<Vec<Decimal>>(),
            Ok(vec![
                Decimal::from_f64(1.5),
                Decimal::from(2),
                Decimal::from_f64(-2.5)
            ])
        );
    }

    #[test]
    fn test_append_resets_non_array_node() {
        let doc = ConfigDoc::parse(r#"{"x": 7}"#).unwrap();
        doc.root().at("x").append(1);
        doc.root().at("x").append(2);
        assert_eq!(doc.root().at("x").read::<Vec<i32>>(), Ok(vec![1, 2]));
    }

    #[test]
    fn test_styled_and_compact_rendering() {
        let doc = ConfigDoc::parse(r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(doc.root().at("a").to_compact_string(), "[1,2]");
        assert_eq!(doc.root().at("missing").to_compact_string(), "null");
        let styled = doc.root().to_styled_string();
        assert!(styled.contains('\n'));
        assert!(styled.contains("\"a\""));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"lot": 9}}"#).unwrap();
        let doc = ConfigDoc::load(file.path()).unwrap();
        assert_eq!(doc.root().at("lot").read::<i32>(), Ok(9));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(ConfigDoc::load("/no/such/config.json").is_err());
    }
}
