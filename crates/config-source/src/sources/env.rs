//! Environment variable loader.
//!
//! Responsibilities:
//! - Copy process environment variables matching a prefix into a destination.
//! - Provide `.env` file loading with the `DOTENV_DISABLED` gate.
//!
//! Invariants:
//! - The prefix is matched case-insensitively by uppercasing it; variable
//!   names are matched as-is, so `MYTESTX` never matches prefix `MYTEST_`.
//! - Values are stored as strings, exactly as the environment holds them.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is
//!   called.

use serde_json::Value;

use crate::args::SourceArgs;
use crate::constants::DOTENV_DISABLED_VAR;
use crate::error::{ConfigSourceError, SourceResult};
use crate::registry::ConfigMap;

/// Copy environment variables starting with `prefix` into `dest`.
///
/// Arguments:
/// - `prefix` (required string): matched against variable names after being
///   uppercased.
/// - `trim_prefix` (bool, default true): store the part after the prefix
///   instead of the full variable name.
pub fn load(dest: &mut dyn ConfigMap, args: &SourceArgs) -> SourceResult<bool> {
    let prefix = args.require_str("prefix")?.to_uppercase();
    let trim_prefix = args.flag_or("trim_prefix", true)?;

    let mut loaded = false;
    for (key, value) in std::env::vars_os() {
        let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) else {
            continue;
        };
        let Some(trimmed) = key.strip_prefix(&prefix) else {
            continue;
        };
        let stored = if trim_prefix { trimmed.to_string() } else { key };
        if stored.is_empty() {
            continue;
        }
        dest.set(stored, Value::String(value));
        loaded = true;
    }
    Ok(loaded)
}

/// Load environment variables from a `.env` file if present.
///
/// Returns `Ok(true)` when a file was loaded and `Ok(false)` when there is no
/// `.env` file or loading is disabled via the `DOTENV_DISABLED` environment
/// variable (set to "true" or "1", useful for testing).
///
/// # Errors
///
/// - [`ConfigSourceError::DotenvParse`] if the file has invalid syntax.
/// - [`ConfigSourceError::DotenvIo`] if the file cannot be read.
///
/// Error values never include raw `.env` line contents to prevent secret
/// leakage.
pub fn load_dotenv() -> SourceResult<bool> {
    if dotenv_disabled() {
        return Ok(false);
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(true),
        Err(e) if is_not_found(&e) => Ok(false),
        Err(dotenvy::Error::LineParse(_, idx)) => {
            Err(ConfigSourceError::DotenvParse { error_index: idx })
        }
        Err(dotenvy::Error::Io(io_err)) => Err(ConfigSourceError::DotenvIo {
            kind: io_err.kind(),
        }),
        Err(_) => Err(ConfigSourceError::DotenvUnknown),
    }
}

fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::collections::BTreeMap;

    const VARS: [(&str, Option<&str>); 3] = [
        ("MYTEST_ONE", Some("12")),
        ("MYTEST_TWO", Some("hello")),
        ("MYTESTX", Some("1")),
    ];

    fn prefix_args(prefix: &str) -> SourceArgs {
        SourceArgs::new().with("prefix", prefix)
    }

    #[test]
    #[serial]
    fn test_no_matching_vars_returns_false() {
        let mut dest = BTreeMap::new();
        let res = load(&mut dest, &prefix_args("MYTEST_")).unwrap();
        assert!(!res);
        assert!(dest.is_empty());
    }

    #[test]
    #[serial]
    fn test_trims_prefix_by_default() {
        temp_env::with_vars(VARS, || {
            let mut dest = BTreeMap::new();
            let res = load(&mut dest, &prefix_args("MYTEST_")).unwrap();

            assert!(res);
            // MYTESTX lacks the separator, so the prefix never matches.
            assert_eq!(
                dest,
                BTreeMap::from([
                    ("ONE".to_string(), json!("12")),
                    ("TWO".to_string(), json!("hello")),
                ])
            );
        });
    }

    #[test]
    #[serial]
    fn test_keeps_full_names_without_trim() {
        temp_env::with_vars(VARS, || {
            let mut dest = BTreeMap::new();
            let args = prefix_args("MYTEST_").with("trim_prefix", false);
            let res = load(&mut dest, &args).unwrap();

            assert!(res);
            assert_eq!(
                dest,
                BTreeMap::from([
                    ("MYTEST_ONE".to_string(), json!("12")),
                    ("MYTEST_TWO".to_string(), json!("hello")),
                ])
            );
        });
    }

    #[test]
    #[serial]
    fn test_prefix_is_case_insensitive() {
        temp_env::with_vars(VARS, || {
            let mut dest = BTreeMap::new();
            let res = load(&mut dest, &prefix_args("mytest_")).unwrap();

            assert!(res);
            assert_eq!(dest.get("ONE"), Some(&json!("12")));
        });
    }

    #[test]
    #[serial]
    fn test_missing_prefix_argument() {
        let mut dest = BTreeMap::new();
        let err = load(&mut dest, &SourceArgs::new()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required argument: prefix");
    }

    #[test]
    #[serial]
    fn test_dotenv_disabled_gate() {
        temp_env::with_vars([(DOTENV_DISABLED_VAR, Some("true"))], || {
            let res = load_dotenv().unwrap();
            assert!(!res, "disabled dotenv loading should report nothing loaded");
        });
    }
}
