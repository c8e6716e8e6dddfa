//! CIDR range value type.

use ipnet::IpNet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing a CIDR range from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CidrParseError {
    /// The input was empty.
    #[error("empty CIDR notation")]
    Empty,

    /// The input was not a valid address or prefix.
    #[error("invalid CIDR notation: {0}")]
    Invalid(String),
}

/// A network-address range: an address plus prefix length.
///
/// Parsed from either `address/prefix` form or a bare address, which means
/// that single host only (`/32` for IPv4, `/128` for IPv6). Immutable once
/// constructed. `Display` reproduces the canonical textual form, so a bare
/// address renders bare.
///
/// Equality and hashing compare the parsed network value, so `10.0.0.5`
/// and `10.0.0.5/32` are the same range.
#[derive(Debug, Clone)]
pub struct CidrRange {
    /// Parsed network prefix.
    net: IpNet,

    /// Whether the source text was a bare address.
    host_only: bool,
}

impl CidrRange {
    /// Check whether `addr` falls within this range.
    ///
    /// The address's value masked by the prefix length must equal the
    /// range's network address masked the same way. An address of the other
    /// IP family is simply not contained.
    #[must_use]
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.net.contains(&addr)
    }

    /// The range's address.
    #[must_use]
    pub fn addr(&self) -> IpAddr {
        self.net.addr()
    }

    /// The range's prefix length.
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.net.prefix_len()
    }
}

impl FromStr for CidrRange {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CidrParseError::Empty);
        }

        if s.contains('/') {
            let net = s
                .parse::<IpNet>()
                .map_err(|_| CidrParseError::Invalid(s.to_string()))?;
            Ok(Self {
                net,
                host_only: false,
            })
        } else {
            let addr = s
                .parse::<IpAddr>()
                .map_err(|_| CidrParseError::Invalid(s.to_string()))?;
            Ok(Self {
                net: IpNet::from(addr),
                host_only: true,
            })
        }
    }
}

impl fmt::Display for CidrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host_only {
            write!(f, "{}", self.net.addr())
        } else {
            write!(f, "{}", self.net)
        }
    }
}

impl PartialEq for CidrRange {
    fn eq(&self, other: &Self) -> bool {
        self.net == other.net
    }
}

impl Eq for CidrRange {}

impl Hash for CidrRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.net.hash(state);
    }
}

impl From<IpNet> for CidrRange {
    fn from(net: IpNet) -> Self {
        Self {
            net,
            host_only: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixed() {
        let range: CidrRange = "10.0.0.0/24".parse().unwrap();
        assert_eq!(range.prefix_len(), 24);
        assert_eq!(range.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_parse_bare_address_is_host_only() {
        let range: CidrRange = "192.168.1.5".parse().unwrap();
        assert_eq!(range.prefix_len(), 32);
        assert_eq!(range.to_string(), "192.168.1.5");
    }

    #[test]
    fn test_parse_ipv6() {
        let range: CidrRange = "2001:db8::/32".parse().unwrap();
        assert_eq!(range.prefix_len(), 32);

        let host: CidrRange = "2001:db8::1".parse().unwrap();
        assert_eq!(host.prefix_len(), 128);
        assert_eq!(host.to_string(), "2001:db8::1");
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!("".parse::<CidrRange>(), Err(CidrParseError::Empty));
        assert_eq!("   ".parse::<CidrRange>(), Err(CidrParseError::Empty));
        assert!(matches!(
            "noatsymbol".parse::<CidrRange>(),
            Err(CidrParseError::Invalid(_))
        ));
        assert!(matches!(
            "10.0.0.0/33".parse::<CidrRange>(),
            Err(CidrParseError::Invalid(_))
        ));
        assert!(matches!(
            "256.0.0.1".parse::<CidrRange>(),
            Err(CidrParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_containment() {
        let range: CidrRange = "10.0.0.0/24".parse().unwrap();
        assert!(range.contains("10.0.0.1".parse().unwrap()));
        assert!(range.contains("10.0.0.255".parse().unwrap()));
        assert!(!range.contains("10.0.1.1".parse().unwrap()));
    }

    #[test]
    fn test_host_only_containment() {
        let range: CidrRange = "192.168.1.5".parse().unwrap();
        assert!(range.contains("192.168.1.5".parse().unwrap()));
        assert!(!range.contains("192.168.1.6".parse().unwrap()));
    }

    #[test]
    fn test_mixed_family_is_a_non_match() {
        let v4: CidrRange = "10.0.0.0/8".parse().unwrap();
        assert!(!v4.contains("2001:db8::1".parse().unwrap()));

        let v6: CidrRange = "2001:db8::/32".parse().unwrap();
        assert!(!v6.contains("10.1.1.1".parse().unwrap()));
    }

    #[test]
    fn test_match_all_prefix() {
        let range: CidrRange = "0.0.0.0/0".parse().unwrap();
        assert!(range.contains("1.2.3.4".parse().unwrap()));
        assert!(range.contains("255.255.255.255".parse().unwrap()));
    }

    #[test]
    fn test_equality_ignores_textual_form() {
        let bare: CidrRange = "10.0.0.5".parse().unwrap();
        let prefixed: CidrRange = "10.0.0.5/32".parse().unwrap();
        assert_eq!(bare, prefixed);
    }
}
