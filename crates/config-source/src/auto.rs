//! Best-effort source auto-detection.
//!
//! Responsibilities:
//! - Infer which built-in source fits an input from its shape: a mapping, a
//!   file path (by extension), or a serialized object.
//! - Drive `DictConfig::load_from` with the detected source.
//!
//! Invariants:
//! - `.json` paths load as JSON, `.yaml`/`.yml` as YAML; every other path
//!   (including extensionless ones) falls back to the TOML source.
//! - Detection never reads the input; it only looks at its shape.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::args::SourceArgs;
use crate::config::DictConfig;
use crate::constants::{SOURCE_DICT, SOURCE_JSON, SOURCE_OBJECT, SOURCE_TOML, SOURCE_YAML};
use crate::error::SourceResult;

/// An input whose source is inferred rather than named by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigInput {
    /// A plain key/value mapping.
    Map(Map<String, Value>),
    /// A config file on disk.
    Path(PathBuf),
    /// A serialized in-process object.
    Object(Value),
}

impl ConfigInput {
    /// Wrap a serializable object.
    pub fn object<T: Serialize>(object: &T) -> SourceResult<Self> {
        Ok(Self::Object(serde_json::to_value(object)?))
    }
}

impl From<PathBuf> for ConfigInput {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ConfigInput {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigInput {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for ConfigInput {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Map<String, Value>> for ConfigInput {
    fn from(map: Map<String, Value>) -> Self {
        Self::Map(map)
    }
}

/// Infer the source name for an input from its shape.
pub fn detect_source(input: &ConfigInput) -> &'static str {
    match input {
        ConfigInput::Map(_) => SOURCE_DICT,
        ConfigInput::Object(_) => SOURCE_OBJECT,
        ConfigInput::Path(path) => match path.extension().and_then(|e| e.to_str()) {
            Some("json") => SOURCE_JSON,
            Some("yaml" | "yml") => SOURCE_YAML,
            _ => SOURCE_TOML,
        },
    }
}

/// Loads a [`DictConfig`] from inputs whose source is auto-detected.
#[derive(Debug)]
pub struct DictConfigLoader<'a> {
    config: &'a mut DictConfig,
}

impl<'a> DictConfigLoader<'a> {
    pub fn new(config: &'a mut DictConfig) -> Self {
        Self { config }
    }

    /// Detect the source for `input` and load it, forwarding `extra`
    /// arguments (e.g. `silent`) to the loader unchanged.
    pub fn load(
        &mut self,
        input: impl Into<ConfigInput>,
        extra: SourceArgs,
    ) -> SourceResult<bool> {
        let input = input.into();
        let source = detect_source(&input);
        let args = match input {
            ConfigInput::Map(map) => extra.with("value", Value::Object(map)),
            ConfigInput::Object(value) => extra.with("value", value),
            ConfigInput::Path(path) => extra.with("path", path.display().to_string()),
        };
        self.config.load_from(source, args)
    }
}
