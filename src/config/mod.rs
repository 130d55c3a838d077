//! configuration access
//!
//! the engine reads its options through [`OptionReader`]. [`ConfigFile`] is
//! the bundled reader: a JSON5 document mapping section names to objects of
//! option keys, e.g.
//!
//! ```json5
//! {
//!   CPU: {
//!     IfAboveValue: 90,
//!     IfAboveAction: "!Log hot",
//!     IfCondition: "CPU > 50 && CPU < 90",
//!     IfTrueAction: "!Log busy",
//!   },
//! }
//! ```

mod file;

pub use file::ConfigFile;

use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

const CONFIG_ENV_VAR: &str = "IFACTIONS_CONFIG";

/// reads typed option values from a named section
///
/// lookups never fail: a missing or unusable value yields `default`
pub trait OptionReader {
    /// with `allow_empty` false, a present but empty value also yields `default`
    fn read_string(&self, section: &str, key: &str, default: &str, allow_empty: bool) -> String;

    fn read_float(&self, section: &str, key: &str, default: f64) -> f64;

    fn read_bool(&self, section: &str, key: &str, default: bool) -> bool;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not find home directory")]
    NoHome,

    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON5: {0}")]
    Syntax(String),

    #[error("top-level value must be an object of sections")]
    RootShape,

    #[error("section '{0}' must be an object")]
    SectionShape(String),
}

/// resolve the config path: explicit override, then `IFACTIONS_CONFIG`,
/// then `~/.ifactions/config.json5`
pub fn get_config_path(override_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    Ok(dirs::home_dir()
        .ok_or(ConfigError::NoHome)?
        .join(".ifactions")
        .join("config.json5"))
}

/// load the config file from the resolved path
pub fn load(override_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = get_config_path(override_path)?;
    ConfigFile::load(&path)
}
