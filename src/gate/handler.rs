//! Pre-login gate handler.

use crate::registry::ExemptionRegistry;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the host should do with a connecting client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Proceed with the normal session-authentication handshake.
    Proceed,

    /// Skip the session-authentication handshake for this client.
    BypassAuth,

    /// Deny the connection, showing `message` to the client.
    Deny {
        /// Explanation naming the offending address, so an administrator
        /// can add it.
        message: String,
    },
}

/// Handles pre-login connection events against the exemption registry.
pub struct SessionGate {
    /// Shared registry.
    registry: Arc<ExemptionRegistry>,
}

impl SessionGate {
    /// Create a gate over `registry`.
    #[must_use]
    pub fn new(registry: Arc<ExemptionRegistry>) -> Self {
        Self { registry }
    }

    /// Decide the disposition for a connecting client.
    ///
    /// A user with no registry entry proceeds normally. A listed user whose
    /// address falls within one of their ranges bypasses authentication.
    /// A listed user whose address matches none of their ranges is denied
    /// with a message naming the address.
    #[must_use]
    pub fn check(&self, username: &str, client_addr: IpAddr) -> GateDecision {
        let ranges = self.registry.list_ranges(username);
        if ranges.is_empty() {
            debug!("no exemption entry for {username}, authenticating normally");
            return GateDecision::Proceed;
        }

        info!("checking session skip exemptions for {username}");

        if let Some(range) = ranges.iter().find(|range| range.contains(client_addr)) {
            info!("{username} matched range {range}, skipping session authentication");
            return GateDecision::BypassAuth;
        }

        warn!("{username} is in the session skip list, but {client_addr} matched no range");
        GateDecision::Deny {
            message: format!(
                "Your username is in the session skip list, but you don't match the IP ranges. Ask an admin to add {client_addr}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use tempfile::tempdir;

    fn gate_with(entries: &[(&str, &str)]) -> (tempfile::TempDir, SessionGate) {
        let dir = tempdir().unwrap();
        let registry = ExemptionRegistry::new(ConfigFile::new(dir.path().join("sessionskip.yml")));
        registry.load().unwrap();
        for (user, cidr) in entries {
            registry.add_range(user, cidr.parse().unwrap()).unwrap();
        }
        (dir, SessionGate::new(Arc::new(registry)))
    }

    #[test]
    fn test_unlisted_user_proceeds() {
        let (_dir, gate) = gate_with(&[]);
        assert_eq!(
            gate.check("alice", "10.0.0.1".parse().unwrap()),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_matched_user_bypasses_auth() {
        let (_dir, gate) = gate_with(&[("bob", "10.0.0.0/8")]);
        assert_eq!(
            gate.check("bob", "10.1.1.1".parse().unwrap()),
            GateDecision::BypassAuth
        );
    }

    #[test]
    fn test_mismatched_user_is_denied_with_address() {
        let (_dir, gate) = gate_with(&[("bob", "10.0.0.0/8")]);
        match gate.check("bob", "192.168.1.1".parse().unwrap()) {
            GateDecision::Deny { message } => assert!(message.contains("192.168.1.1")),
            other => panic!("expected denial, got {other:?}"),
        }
    }
}
