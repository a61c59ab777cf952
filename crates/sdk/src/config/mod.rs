//! Configuration documents and lazy path-based access.
//!
//! Strategies receive their settings as a JSON document. [`ConfigDoc`] owns
//! the parsed tree, [`ConfigView`] navigates it without touching it, and
//! typed reads go through [`FromConfig`] with full-path diagnostics:
//!
//! ```
//! use arena_sdk::config::ConfigDoc;
//!
//! let doc = ConfigDoc::parse(r#"{"spread": {"min_steps": 2}}"#).unwrap();
//! let steps: i32 = doc.root().at("spread").at("min_steps").read_or(1).unwrap();
//! assert_eq!(steps, 2);
//! ```

mod path;
mod view;

pub use path::{ConfigPath, PathStep};
pub use view::{ConfigDoc, ConfigError, ConfigView, FromConfig, ValueKind};
