//! YAML-backed exemption list file.

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Root key of the subsection this crate owns inside the document.
const SECTION_KEY: &str = "sessionskip";

/// Key of the exemption list inside the owned subsection.
const PLAYERS_KEY: &str = "players";

/// Default document written when no configuration file exists yet.
const DEFAULT_TEMPLATE: &str = "\
# SessionSkip exemption list.
#
# Each entry pairs a username with a network range that may skip the
# session-authentication handshake, in the form \"username@cidr\".
# A bare address exempts that single host only.
#
# Example:
#   players:
#     - \"alice@10.0.0.0/24\"
#     - \"bob@192.168.1.5\"
sessionskip:
  players: []
";

/// The `sessionskip` subsection as this crate reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SkipSection {
    /// Exemption entries in `username@cidr` form.
    #[serde(default)]
    players: Vec<String>,
}

/// Handle to the exemption list's backing file.
///
/// Reads and writes the `sessionskip.players` list while leaving unrelated
/// keys at the document root untouched. Writes go to a temporary file in
/// the same directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Path to the YAML document.
    path: PathBuf,
}

impl ConfigFile {
    /// Create a handle for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the backing file exists, creating any missing parent directory
    /// and writing the default template if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CreateError` if the directory or file cannot
    /// be created.
    pub fn ensure_exists(&self) -> ConfigResult<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        fs::write(&self.path, DEFAULT_TEMPLATE).map_err(|e| ConfigError::CreateError {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Read the raw `username@cidr` entries from the document.
    ///
    /// A missing `sessionskip` section or `players` list reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the document is not
    /// valid YAML.
    pub fn read_entries(&self) -> ConfigResult<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| ConfigError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;

        let root: Value = serde_yaml::from_str(&content)?;
        let section = match root.get(SECTION_KEY) {
            Some(value) if !value.is_null() => {
                serde_yaml::from_value::<SkipSection>(value.clone())?
            },
            _ => SkipSection::default(),
        };

        Ok(section.players)
    }

    /// Replace the `sessionskip.players` list with `entries`, preserving
    /// every other key already present in the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing document cannot be read or parsed,
    /// or if the rewritten document cannot be written.
    pub fn write_entries(&self, entries: &[String]) -> ConfigResult<()> {
        let mut root = self.read_document()?;

        let section_key = Value::from(SECTION_KEY);
        let mut section = match root.remove(&section_key) {
            Some(Value::Mapping(mapping)) => mapping,
            _ => Mapping::new(),
        };

        let players: Vec<Value> = entries.iter().map(|e| Value::from(e.as_str())).collect();
        section.insert(Value::from(PLAYERS_KEY), Value::Sequence(players));
        root.insert(section_key, Value::Mapping(section));

        let rendered = serde_yaml::to_string(&Value::Mapping(root))?;
        self.write_atomic(&rendered)
    }

    /// Read the document root as a mapping. A missing or empty file reads
    /// as an empty mapping; a non-mapping root is replaced by one.
    fn read_document(&self) -> ConfigResult<Mapping> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Mapping::new()),
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: self.path.clone(),
                    source: e,
                })
            },
        };

        match serde_yaml::from_str::<Value>(&content)? {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Ok(Mapping::new()),
        }
    }

    /// Write `content` to a sibling temp file and rename it into place.
    fn write_atomic(&self, content: &str) -> ConfigResult<()> {
        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, content).map_err(|e| ConfigError::WriteError {
            path: tmp_path.clone(),
            source: e,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| ConfigError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}
