//! The exempt command dispatcher.

use super::messages;
use crate::registry::{CidrRange, ExemptionRegistry};
use std::sync::Arc;
use tracing::error;

/// Permission the host must check before dispatching any subcommand.
pub const PERMISSION: &str = "command.exempt";

/// All subcommand names.
const ALL_SUBCOMMANDS: [&str; 6] = ["add", "remove", "removeall", "list", "listplayers", "reload"];

/// Subcommands whose first argument is a player name.
const PLAYER_ARG_SUBCOMMANDS: [&str; 4] = ["add", "remove", "removeall", "list"];

/// Dispatcher over the six exempt subcommands.
///
/// Dispatch is by exact argument count, then subcommand name; there are no
/// flags. A shape that matches nothing produces the generic usage line and
/// performs no action. Every invocation yields a single plain-text line.
pub struct ExemptCommand {
    /// Shared registry.
    registry: Arc<ExemptionRegistry>,
}

impl ExemptCommand {
    /// Create a dispatcher over `registry`.
    #[must_use]
    pub fn new(registry: Arc<ExemptionRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a command line, returning the response to show the operator.
    #[must_use]
    pub fn execute(&self, args: &[&str]) -> String {
        self.try_execute(args)
            .unwrap_or_else(|| messages::USAGE.to_string())
    }

    /// Dispatch to a subcommand, or `None` if no shape matched.
    fn try_execute(&self, args: &[&str]) -> Option<String> {
        let cmd = args.first().map(|c| c.to_ascii_lowercase());
        let cmd = cmd.as_deref();

        match args.len() {
            1 => match cmd {
                Some("listplayers") => Some(self.list_players()),
                Some("reload") => Some(self.reload()),
                _ => None,
            },
            2 => match cmd {
                Some("removeall") => Some(self.remove_all(args[1])),
                Some("list") => Some(self.list(args[1])),
                _ => None,
            },
            3 => match cmd {
                Some("add") => Some(self.add_remove(args[1], args[2], true)),
                Some("remove") => Some(self.add_remove(args[1], args[2], false)),
                _ => None,
            },
            _ => None,
        }
    }

    /// `/exempt listplayers`
    fn list_players(&self) -> String {
        let players = self.registry.list_users();
        if players.is_empty() {
            messages::NO_EXEMPTIONS.to_string()
        } else {
            messages::list_exemptions(&players.join(", "))
        }
    }

    /// `/exempt list <player>`
    fn list(&self, player: &str) -> String {
        let cidrs: Vec<String> = self
            .registry
            .list_ranges(player)
            .iter()
            .map(ToString::to_string)
            .collect();

        if cidrs.is_empty() {
            messages::not_exempted(player)
        } else {
            messages::is_exempted(player, &cidrs.join(", "))
        }
    }

    /// `/exempt removeall <player>`
    fn remove_all(&self, player: &str) -> String {
        match self.registry.remove_all_ranges(player) {
            Ok(true) => messages::REMOVE_ALL.to_string(),
            Ok(false) => messages::REMOVE_ALL_FAIL.to_string(),
            Err(e) => {
                error!("failed to persist exemption change: {e}");
                messages::CONFIG_FAIL.to_string()
            },
        }
    }

    /// `/exempt add <player> <cidr>` and `/exempt remove <player> <cidr>`
    fn add_remove(&self, player: &str, cidr_text: &str, is_add: bool) -> String {
        let cidr: CidrRange = match cidr_text.parse() {
            Ok(cidr) => cidr,
            Err(_) => return messages::INVALID_CIDR.to_string(),
        };

        let result = if is_add {
            self.registry.add_range(player, cidr)
        } else {
            self.registry.remove_range(player, &cidr)
        };

        match (result, is_add) {
            (Ok(true), true) => messages::added(player, cidr_text),
            (Ok(false), true) => messages::add_exists(player, cidr_text),
            (Ok(true), false) => messages::removed(player, cidr_text),
            (Ok(false), false) => messages::remove_missing(player, cidr_text),
            (Err(e), _) => {
                error!("failed to persist exemption change: {e}");
                messages::CONFIG_FAIL.to_string()
            },
        }
    }

    /// `/exempt reload`
    fn reload(&self) -> String {
        match self.registry.reload() {
            Ok(()) => messages::reload_success(self.registry.user_count()),
            Err(e) => {
                error!("failed to reload exemption registry: {e}");
                messages::RELOAD_FAIL.to_string()
            },
        }
    }

    /// Completions for a partial command line, filtered by case-sensitive
    /// prefix match.
    ///
    /// No tokens yet: all subcommand names. One token: subcommand names.
    /// Two tokens after a player-taking subcommand: known usernames. Three
    /// tokens after `remove`: that player's range strings. Anything else:
    /// nothing.
    #[must_use]
    pub fn suggest(&self, args: &[&str]) -> Vec<String> {
        match args.len() {
            0 => ALL_SUBCOMMANDS.iter().map(ToString::to_string).collect(),
            1 => filter_prefix(ALL_SUBCOMMANDS.iter().map(ToString::to_string), args[0]),
            2 if PLAYER_ARG_SUBCOMMANDS.contains(&args[0]) => {
                filter_prefix(self.registry.list_users().into_iter(), args[1])
            },
            3 if args[0] == "remove" => filter_prefix(
                self.registry
                    .list_ranges(args[1])
                    .iter()
                    .map(ToString::to_string),
                args[2],
            ),
            _ => Vec::new(),
        }
    }
}

/// Keep the candidates starting with `prefix`.
fn filter_prefix(candidates: impl Iterator<Item = String>, prefix: &str) -> Vec<String> {
    candidates.filter(|c| c.starts_with(prefix)).collect()
}
