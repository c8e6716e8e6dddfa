//! Match-engine evaluation over the exemption registry.

use crate::registry::ExemptionRegistry;
use std::net::IpAddr;

/// Result of matching a connecting client against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The username has no registry entry; the caller proceeds with normal
    /// authentication.
    NoRule,

    /// The client address fell within at least one of the user's ranges;
    /// the caller bypasses normal authentication.
    Matched,

    /// The username is listed but the client address matched none of its
    /// ranges; the caller denies the connection with a message naming the
    /// offending address.
    MismatchedRanges,
}

/// Match `client_addr` against `username`'s exempted ranges.
///
/// The first matching range wins; ranges are tried in the registry's
/// insertion order. An address of the other IP family is simply a
/// non-match.
#[must_use]
pub fn evaluate(registry: &ExemptionRegistry, username: &str, client_addr: IpAddr) -> Outcome {
    let ranges = registry.list_ranges(username);
    if ranges.is_empty() {
        return Outcome::NoRule;
    }

    if ranges.iter().any(|range| range.contains(client_addr)) {
        Outcome::Matched
    } else {
        Outcome::MismatchedRanges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use tempfile::tempdir;

    fn registry_with(entries: &[(&str, &str)]) -> (tempfile::TempDir, ExemptionRegistry) {
        let dir = tempdir().unwrap();
        let registry = ExemptionRegistry::new(ConfigFile::new(dir.path().join("sessionskip.yml")));
        registry.load().unwrap();
        for (user, cidr) in entries {
            registry.add_range(user, cidr.parse().unwrap()).unwrap();
        }
        (dir, registry)
    }

    #[test]
    fn test_unknown_user_has_no_rule() {
        let (_dir, registry) = registry_with(&[]);
        assert_eq!(
            evaluate(&registry, "alice", "10.0.0.1".parse().unwrap()),
            Outcome::NoRule
        );
    }

    #[test]
    fn test_address_in_range_matches() {
        let (_dir, registry) = registry_with(&[("bob", "10.0.0.0/8")]);
        assert_eq!(
            evaluate(&registry, "bob", "10.1.1.1".parse().unwrap()),
            Outcome::Matched
        );
    }

    #[test]
    fn test_address_outside_ranges_mismatches() {
        let (_dir, registry) = registry_with(&[("bob", "10.0.0.0/8")]);
        assert_eq!(
            evaluate(&registry, "bob", "192.168.1.1".parse().unwrap()),
            Outcome::MismatchedRanges
        );
    }

    #[test]
    fn test_any_of_several_ranges_matches() {
        let (_dir, registry) =
            registry_with(&[("bob", "10.0.0.0/8"), ("bob", "192.168.1.0/24")]);
        assert_eq!(
            evaluate(&registry, "bob", "192.168.1.7".parse().unwrap()),
            Outcome::Matched
        );
    }

    #[test]
    fn test_other_family_range_is_a_mismatch() {
        let (_dir, registry) = registry_with(&[("bob", "2001:db8::/32")]);
        assert_eq!(
            evaluate(&registry, "bob", "10.1.1.1".parse().unwrap()),
            Outcome::MismatchedRanges
        );
        assert_eq!(
            evaluate(&registry, "bob", "2001:db8::9".parse().unwrap()),
            Outcome::Matched
        );
    }
}
