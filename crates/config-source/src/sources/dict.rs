//! Mapping loader: copies uppercase keys from a plain key/value mapping.

use crate::args::SourceArgs;
use crate::error::SourceResult;
use crate::registry::ConfigMap;

use super::copy_uppercase;

/// Copy the all-uppercase keys of the `value` argument into `dest`.
///
/// Arguments:
/// - `value` (required object): the mapping to copy from.
/// - `skip_none` (bool, default false): skip null-valued keys instead of
///   writing them, preserving prior destination values.
pub fn load(dest: &mut dyn ConfigMap, args: &SourceArgs) -> SourceResult<bool> {
    let map = args.require_object("value")?;
    let skip_none = args.flag_or("skip_none", false)?;
    Ok(copy_uppercase(dest, map, skip_none))
}
