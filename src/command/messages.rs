//! Operator-facing message catalog for the exempt command.

/// Generic usage line, shown when no subcommand shape matched.
pub const USAGE: &str =
    "Usage: /exempt [add|remove|removeall|list|listplayers|reload] <player> <cidr>";

/// Shown by `listplayers` when the registry is empty.
pub const NO_EXEMPTIONS: &str = "There are no exemptions";

/// Shown when a supplied range does not parse.
pub const INVALID_CIDR: &str = "Invalid cidr";

/// Shown when a mutation could not be persisted.
pub const CONFIG_FAIL: &str = "Error while saving config to disk";

/// Shown when a reload failed on I/O.
pub const RELOAD_FAIL: &str = "I/O error while reloading";

/// Shown by `removeall` on success.
pub const REMOVE_ALL: &str = "Removed all exemptions";

/// Shown by `removeall` when the player had none.
pub const REMOVE_ALL_FAIL: &str = "No exemptions to remove";

pub fn list_exemptions(players: &str) -> String {
    format!("These players are exempted: {players}")
}

pub fn not_exempted(player: &str) -> String {
    format!("Player '{player}' is not exempted")
}

pub fn is_exempted(player: &str, cidrs: &str) -> String {
    format!("Player '{player}' is exempted from the following IP ranges: {cidrs}")
}

pub fn added(player: &str, cidr: &str) -> String {
    format!("Added exemption '{player}@{cidr}'")
}

pub fn add_exists(player: &str, cidr: &str) -> String {
    format!("Did not add exemption '{player}@{cidr}', already exists")
}

pub fn removed(player: &str, cidr: &str) -> String {
    format!("Removed exemption '{player}@{cidr}'")
}

pub fn remove_missing(player: &str, cidr: &str) -> String {
    format!("Did not remove exemption '{player}@{cidr}', doesn't exist")
}

pub fn reload_success(count: usize) -> String {
    format!("Reloaded, {count} players exempted")
}
