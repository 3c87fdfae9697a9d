//! Centralized constants for the config-source crate.
//!
//! Source names and the default config type live here so that loaders,
//! auto-detection, and tests all agree on the same strings.

/// Config type used when a caller or descriptor does not name one.
pub const DEFAULT_CONFIG_TYPE: &str = "dict";

/// Source that copies uppercase attributes of a serialized object.
pub const SOURCE_OBJECT: &str = "object";

/// Source that copies uppercase keys from a plain mapping.
pub const SOURCE_DICT: &str = "dict";

/// Source that copies prefixed process environment variables.
pub const SOURCE_ENV: &str = "env";

/// Source that reads a JSON file or inline JSON text.
pub const SOURCE_JSON: &str = "json";

/// Source that reads a TOML file or inline TOML text.
pub const SOURCE_TOML: &str = "toml";

/// Source that reads a YAML file or inline YAML text.
pub const SOURCE_YAML: &str = "yaml";

/// Environment variable that disables `.env` file loading when set to
/// "true" or "1" (useful for testing).
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";
