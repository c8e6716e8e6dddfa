//! The exemption registry store.

use super::cidr::CidrRange;
use crate::config::{ConfigFile, ConfigResult};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{info, warn};

/// In-memory index from username to exempted network ranges, backed by the
/// persisted configuration file.
///
/// Every public operation is safe to call from multiple threads. Mutating
/// operations hold the write lock across both the in-memory change and the
/// save to disk, so "mutate and persist" is one atomic unit: a mutation is
/// applied to a working copy and swapped in only after the save succeeds,
/// and a failed save leaves both memory and disk unchanged.
#[derive(Debug)]
pub struct ExemptionRegistry {
    /// Backing file.
    file: ConfigFile,

    /// Username to ranges, in insertion order per user. A key is never
    /// present with an empty range list.
    entries: RwLock<HashMap<String, Vec<CidrRange>>>,
}

impl ExemptionRegistry {
    /// Create an empty registry backed by `file`. Call [`load`] to populate
    /// it from disk.
    ///
    /// [`load`]: ExemptionRegistry::load
    #[must_use]
    pub fn new(file: ConfigFile) -> Self {
        Self {
            file,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The backing file.
    #[must_use]
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Populate the registry from disk, replacing any prior in-memory
    /// state. Creates the backing file from the default template (and any
    /// missing parent directory) if it does not exist yet.
    ///
    /// Entries without an `@` separator, or with un-parseable range text,
    /// are skipped with a warning; the rest load normally.
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem failure or if the whole document is
    /// malformed.
    pub fn load(&self) -> ConfigResult<()> {
        let mut entries = self.entries.write().unwrap();
        self.file.ensure_exists()?;
        let parsed = parse_entries(self.file.read_entries()?);
        info!("loaded exemption registry, {} users exempted", parsed.len());
        *entries = parsed;
        Ok(())
    }

    /// Persist the current entries to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn save(&self) -> ConfigResult<()> {
        let entries = self.entries.write().unwrap();
        self.file.write_entries(&serialize_entries(&entries))
    }

    /// Re-read the registry from disk, discarding in-memory state, then
    /// persist the re-normalized form. Mutations running concurrently are
    /// serialized against the reload, not merged into it.
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem failure or if the whole document is
    /// malformed; in-memory state is unchanged in that case.
    pub fn reload(&self) -> ConfigResult<()> {
        let mut entries = self.entries.write().unwrap();
        self.file.ensure_exists()?;
        let parsed = parse_entries(self.file.read_entries()?);
        self.file.write_entries(&serialize_entries(&parsed))?;
        info!("reloaded exemption registry, {} users exempted", parsed.len());
        *entries = parsed;
        Ok(())
    }

    /// Add a range for `user`, creating the user's entry if needed.
    ///
    /// Returns `true` and persists if the range was not already present;
    /// returns `false` without touching memory or disk if it was.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; the in-memory state is left
    /// unchanged.
    pub fn add_range(&self, user: &str, cidr: CidrRange) -> ConfigResult<bool> {
        let mut entries = self.entries.write().unwrap();
        if entries.get(user).is_some_and(|ranges| ranges.contains(&cidr)) {
            return Ok(false);
        }

        let mut working = entries.clone();
        working.entry(user.to_string()).or_default().push(cidr);
        self.file.write_entries(&serialize_entries(&working))?;
        *entries = working;
        Ok(true)
    }

    /// Remove a range from `user`, dropping the user's entry entirely if
    /// that was their last range.
    ///
    /// Returns `true` and persists if the range was present; `false` if it
    /// was not.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; the in-memory state is left
    /// unchanged.
    pub fn remove_range(&self, user: &str, cidr: &CidrRange) -> ConfigResult<bool> {
        let mut entries = self.entries.write().unwrap();
        let Some(pos) = entries
            .get(user)
            .and_then(|ranges| ranges.iter().position(|r| r == cidr))
        else {
            return Ok(false);
        };

        let mut working = entries.clone();
        if let Some(ranges) = working.get_mut(user) {
            ranges.remove(pos);
            if ranges.is_empty() {
                working.remove(user);
            }
        }
        self.file.write_entries(&serialize_entries(&working))?;
        *entries = working;
        Ok(true)
    }

    /// Remove every range for `user`.
    ///
    /// Returns `true` and persists if the user had any entries; `false` if
    /// the user was not present.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; the in-memory state is left
    /// unchanged.
    pub fn remove_all_ranges(&self, user: &str) -> ConfigResult<bool> {
        let mut entries = self.entries.write().unwrap();
        if !entries.contains_key(user) {
            return Ok(false);
        }

        let mut working = entries.clone();
        working.remove(user);
        self.file.write_entries(&serialize_entries(&working))?;
        *entries = working;
        Ok(true)
    }

    /// All ranges for `user`, in insertion order. Empty if the user has no
    /// entry.
    #[must_use]
    pub fn list_ranges(&self, user: &str) -> Vec<CidrRange> {
        self.entries
            .read()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or_default()
    }

    /// All usernames with at least one range. Order is not meaningful.
    #[must_use]
    pub fn list_users(&self) -> Vec<String> {
        self.entries.read().unwrap().keys().cloned().collect()
    }

    /// Number of users with at least one range.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

/// Parse raw `username@cidr` entries into the registry mapping, skipping
/// malformed entries with a warning. The username is everything before the
/// last `@`. Duplicate ranges for a user collapse to one.
fn parse_entries(raw: Vec<String>) -> HashMap<String, Vec<CidrRange>> {
    let mut map: HashMap<String, Vec<CidrRange>> = HashMap::new();

    for entry in raw {
        let Some((user, cidr_text)) = entry.rsplit_once('@') else {
            warn!("skipping exemption entry without '@' separator: {entry}");
            continue;
        };

        match cidr_text.parse::<CidrRange>() {
            Ok(cidr) => {
                let ranges = map.entry(user.to_string()).or_default();
                if !ranges.contains(&cidr) {
                    ranges.push(cidr);
                }
            },
            Err(e) => warn!("skipping exemption entry '{entry}': {e}"),
        }
    }

    map
}

/// Serialize the registry mapping back into `username@cidr` entries, users
/// in sorted order and each user's ranges in insertion order.
fn serialize_entries(entries: &HashMap<String, Vec<CidrRange>>) -> Vec<String> {
    let mut users: Vec<&String> = entries.keys().collect();
    users.sort();

    users
        .into_iter()
        .flat_map(|user| entries[user].iter().map(move |cidr| format!("{user}@{cidr}")))
        .collect()
}
