use std::env;
use std::path::PathBuf;
use crate::renderer::Markers;

/// Environment variable holding the global prefix.
pub const PREFIX_VAR: &str = "DABUG_PREFIX";

/// Environment variable toggling autoflush.
pub const AUTOFLUSH_VAR: &str = "DABUG_AUTOFLUSH";

/// Settings shared by every entry a [`Tracer`](crate::Tracer) records.
///
/// All fields can be changed on a live tracer; the last write wins.
///
/// # Examples
///
/// ```
/// # use dabug::Config;
/// let config = Config {
///     prefix: "[worker] ".to_string(),
///     autoflush: true,
///     ..Config::default()
/// };
/// assert_eq!(config.markers.begin, "-----");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prepended to every entry prefix and to the block markers.
    pub prefix: String,

    /// Write each entry as soon as it is recorded instead of buffering it.
    ///
    /// Off by default: entries accumulate until an explicit flush.
    pub autoflush: bool,

    /// Lines bracketing a flushed block.
    pub markers: Markers,

    /// Source paths are reported relative to this directory when they lie
    /// inside it. Defaults to the working directory at construction.
    pub base_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            autoflush: false,
            markers: Markers::default(),
            base_dir: env::current_dir().ok(),
        }
    }
}

impl Config {
    /// Builds the default configuration, overridden by `DABUG_PREFIX` and
    /// `DABUG_AUTOFLUSH` when they are set.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(prefix) = env::var(PREFIX_VAR) {
            config.prefix = prefix;
        }

        if let Ok(value) = env::var(AUTOFLUSH_VAR) {
            match parse_flag(&value) {
                Some(flag) => config.autoflush = flag,
                None => tracing::warn!(
                    var = AUTOFLUSH_VAR,
                    value = %value,
                    "ignoring unrecognized boolean"
                ),
            }
        }

        config
    }
}

/// Parses the boolean spellings accepted in environment variables.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prefix, "");
        assert!(!config.autoflush);
        assert_eq!(config.markers, Markers::new("-----", "====="));
    }

    #[test]
    fn test_parse_flag() {
        for on in ["1", "true", "TRUE", " yes ", "On"] {
            assert_eq!(parse_flag(on), Some(true), "{on}");
        }
        for off in ["0", "false", "No", "off"] {
            assert_eq!(parse_flag(off), Some(false), "{off}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
