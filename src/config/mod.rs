//! # Configuration Persistence
//!
//! This module owns the exemption list's backing file: a YAML document with
//! a `sessionskip.players` list of `username@cidr` entries. The registry
//! owns only that subsection; unrelated keys at the document root are
//! preserved across saves.
//!
//! Writes are atomic (temp file + rename), so a crash mid-save never leaves
//! a truncated or corrupted document behind.

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::ConfigFile;
