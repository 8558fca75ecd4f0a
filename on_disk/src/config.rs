//! Repository configuration stored as TOML in `.strand/config`.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use strand_core::diff::DEFAULT_CONTEXT_LINES;
use strand_core::repo::{Error, Result};

use crate::atomic_write::write_atomic;

/// The only repository format this crate reads and writes.
pub const FORMAT_VERSION: u32 = 1;

/// Environment variable that overrides the configured author name.
pub const AUTHOR_NAME_VAR: &str = "STRAND_AUTHOR_NAME";

/// Environment variable that overrides the configured author e-mail.
pub const AUTHOR_EMAIL_VAR: &str = "STRAND_AUTHOR_EMAIL";

const FALLBACK_NAME: &str = "Unknown User";
const FALLBACK_EMAIL: &str = "user@localhost";

/// Contents of `.strand/config`. Missing keys take their defaults.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub core: CoreConfig,
    pub user: UserConfig,
    pub diff: DiffConfig,

    /// Remote name to the work dir of another repository.
    pub remotes: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct CoreConfig {
    pub format_version: u32,
    pub default_branch: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            format_version: FORMAT_VERSION,
            default_branch: "master".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct UserConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct DiffConfig {
    pub context_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }
}

impl Config {
    /// Read the config file in `meta_dir`. A missing file yields the
    /// defaults; a malformed file or unknown format version is an error.
    pub fn load(meta_dir: &Path) -> Result<Config> {
        let path = meta_dir.join("config");

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file; using defaults");
                return Ok(Config::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config: Config = toml::from_str(&text)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;

        if config.core.format_version != FORMAT_VERSION {
            return Err(Error::Config(format!(
                "unsupported format_version {} (expected {})",
                config.core.format_version, FORMAT_VERSION
            )));
        }

        Ok(config)
    }

    /// Write this config to `meta_dir`, replacing the file atomically.
    pub fn save(&self, meta_dir: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self).map_err(|err| Error::Config(err.to_string()))?;
        write_atomic(&meta_dir.join("config"), text.as_bytes())?;
        Ok(())
    }

    /// Resolve the author name and e-mail for new commits.
    ///
    /// Environment variables take precedence over the `[user]` table, which
    /// takes precedence over fixed fallbacks.
    pub fn author(&self) -> (String, String) {
        let name = env::var(AUTHOR_NAME_VAR)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.user.name.clone())
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        let email = env::var(AUTHOR_EMAIL_VAR)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.user.email.clone())
            .unwrap_or_else(|| FALLBACK_EMAIL.to_string());

        (name, email)
    }
}
