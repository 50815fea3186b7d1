//! Environment variable helpers for the config layers.
//!
//! Every setting has a typed default, so a missing or malformed variable
//! never turns into an error:
//!
//! ```
//! use packer_types::env_utils::{env_bool, env_var_or};
//!
//! let timeout: u64 = env_var_or("PACKER_DOC_TIMEOUT_SECS", 30);
//! assert_eq!(timeout, 30);
//! assert!(!env_bool("PACKER_DOC_DEBUG"));
//! ```

use std::str::FromStr;

/// Parse `key`, returning `None` when unset or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse `key`, falling back to `default`.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `true` for `1`, `true`, `yes` or `on` (any case); `false` otherwise.
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Read `key` as a string, using `default` when unset or blank.
pub fn env_string_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}
