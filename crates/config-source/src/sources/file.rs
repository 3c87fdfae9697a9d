//! Structured-data file loaders: JSON, TOML, and YAML.
//!
//! Responsibilities:
//! - Read a config file (or inline text) in one of the supported formats and
//!   copy the uppercase keys of its top-level table into a destination.
//! - Implement the `silent` missing-file contract.
//!
//! Does NOT handle:
//! - Format syntax beyond what the format crates define.
//! - Watching files for changes; loads are one-shot.
//!
//! Invariants:
//! - `silent` only converts a missing file into `Ok(false)`; parse errors and
//!   other I/O failures always propagate.
//! - The top-level value of every file must be an object/table.
//! - File handles are scoped to the read; no handle outlives a load.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::args::SourceArgs;
use crate::error::{ConfigSourceError, SourceResult};
use crate::registry::ConfigMap;

use super::copy_uppercase;

/// Load uppercase keys from a JSON file or inline JSON text.
///
/// Arguments:
/// - `path` (string): file to read; required unless `text` is given.
/// - `text` (string): inline content, used instead of reading a file.
/// - `silent` (bool, default false): report a missing file as `Ok(false)`
///   instead of an error.
pub fn load_json(dest: &mut dyn ConfigMap, args: &SourceArgs) -> SourceResult<bool> {
    let Some(source) = read_source(args, "json")? else {
        return Ok(false);
    };
    let value: Value = serde_json::from_str(&source.text).map_err(|e| ConfigSourceError::Parse {
        name: source.name.clone(),
        message: e.to_string(),
    })?;
    let map = require_table(value, &source.name)?;
    Ok(copy_uppercase(dest, &map, false))
}

/// Load uppercase keys from a TOML file or inline TOML text.
///
/// Arguments are the same as [`load_json`].
pub fn load_toml(dest: &mut dyn ConfigMap, args: &SourceArgs) -> SourceResult<bool> {
    let Some(source) = read_source(args, "toml")? else {
        return Ok(false);
    };
    let table: toml::Table =
        toml::from_str(&source.text).map_err(|e| ConfigSourceError::Parse {
            name: source.name.clone(),
            message: e.to_string(),
        })?;
    let map = require_table(serde_json::to_value(table)?, &source.name)?;
    Ok(copy_uppercase(dest, &map, false))
}

/// Load uppercase keys from a YAML file or inline YAML text.
///
/// Arguments are the same as [`load_json`].
pub fn load_yaml(dest: &mut dyn ConfigMap, args: &SourceArgs) -> SourceResult<bool> {
    let Some(source) = read_source(args, "yaml")? else {
        return Ok(false);
    };
    let value: Value = serde_yaml::from_str(&source.text).map_err(|e| ConfigSourceError::Parse {
        name: source.name.clone(),
        message: e.to_string(),
    })?;
    let map = require_table(value, &source.name)?;
    Ok(copy_uppercase(dest, &map, false))
}

struct SourceText {
    /// Displayed in parse errors: the file path, or "<inline {format}>".
    name: String,
    text: String,
}

/// Resolve the `text`/`path`/`silent` arguments into content to parse.
///
/// `Ok(None)` is the silent missing-file case.
fn read_source(args: &SourceArgs, format: &str) -> SourceResult<Option<SourceText>> {
    if let Some(text) = args.opt_str("text")? {
        return Ok(Some(SourceText {
            name: format!("<inline {format}>"),
            text: text.to_string(),
        }));
    }

    let path = PathBuf::from(args.require_str("path")?);
    let silent = args.flag_or("silent", false)?;

    match std::fs::read_to_string(&path) {
        Ok(text) => Ok(Some(SourceText {
            name: path.display().to_string(),
            text,
        })),
        Err(e)
            if matches!(
                e.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::IsADirectory
            ) =>
        {
            if silent {
                tracing::debug!(path = %path.display(), "config file missing, silent mode");
                Ok(None)
            } else {
                Err(ConfigSourceError::NotFound { path })
            }
        }
        Err(e) => Err(ConfigSourceError::Io { path, source: e }),
    }
}

fn require_table(value: Value, name: &str) -> SourceResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigSourceError::Parse {
            name: name.to_string(),
            message: "top-level value must be an object".to_string(),
        }),
    }
}
