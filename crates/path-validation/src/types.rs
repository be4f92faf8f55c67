// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Name/constraint primitives used by C2 and C4. These are distinct from
//! (but structurally identical to) `x509_types::common::DNSName`: that
//! type models the raw `dNSName` GeneralName string, while this one adds
//! the IP-address sibling and the wildcard-matching relation the policy
//! engine and name-constraint lattice need.

use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DNSName<'a>(&'a str);

impl<'a> DNSName<'a> {
    pub fn new(value: &'a str) -> Option<Self> {
        x509_types::common::DNSName::new(value)?;
        Some(DNSName(value))
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }

    pub fn parent(&self) -> Option<DNSName<'a>> {
        self.0.split_once('.').and_then(|(_, rest)| Self::new(rest))
    }

    /// True if `self` is `other` or a sub-label of `other` (used for
    /// name-constraint subtree matching: a `dNSName` subtree base of
    /// `example.com` matches both `example.com` and `foo.example.com`,
    /// per RFC 5280 §4.2.1.10).
    pub fn is_subdomain_of_or_eq(&self, other: &DNSName<'_>) -> bool {
        if self.0.eq_ignore_ascii_case(other.0) {
            return true;
        }
        self.0
            .to_ascii_lowercase()
            .ends_with(&format!(".{}", other.0.to_ascii_lowercase()))
    }
}

impl PartialEq<str> for DNSName<'_> {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DNSPattern<'a> {
    Exact(DNSName<'a>),
    Wildcard(DNSName<'a>),
}

impl<'a> DNSPattern<'a> {
    pub fn new(pat: &'a str) -> Option<Self> {
        if let Some(rest) = pat.strip_prefix("*.") {
            DNSName::new(rest).map(Self::Wildcard)
        } else {
            DNSName::new(pat).map(Self::Exact)
        }
    }

    pub fn matches(&self, name: &DNSName<'_>) -> bool {
        match self {
            Self::Exact(pat) => pat == name,
            Self::Wildcard(pat) => name.parent().as_ref() == Some(pat),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IPAddress {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl IPAddress {
    pub fn from_str(s: &str) -> Option<Self> {
        if let Ok(v4) = s.parse::<Ipv4Addr>() {
            Some(Self::V4(v4))
        } else {
            s.parse::<Ipv6Addr>().ok().map(Self::V6)
        }
    }

    /// Parse a `GeneralName::IPAddress` octet string: 4 bytes for IPv4, 16
    /// for IPv6. A name-constraint subtree additionally allows a
    /// doubled-length form (address || netmask), handled by the caller.
    pub fn from_bytes(b: &[u8]) -> Option<Self> {
        match b.len() {
            4 => Some(Self::V4(Ipv4Addr::new(b[0], b[1], b[2], b[3]))),
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(b);
                Some(Self::V6(Ipv6Addr::from(octets)))
            }
            _ => None,
        }
    }
}

/// A name-constraint subtree base + mask for `iPAddress`, per RFC 5280
/// §4.2.1.10: the base is `address || netmask`, double the address width.
#[derive(Debug, Clone, Copy)]
pub struct IPAddressMask {
    pub base: IPAddress,
    pub mask: IPAddress,
}

impl IPAddressMask {
    pub fn from_bytes(b: &[u8]) -> Option<Self> {
        match b.len() {
            8 => {
                let addr = Ipv4Addr::new(b[0], b[1], b[2], b[3]);
                let mask = Ipv4Addr::new(b[4], b[5], b[6], b[7]);
                Some(Self {
                    base: IPAddress::V4(addr),
                    mask: IPAddress::V4(mask),
                })
            }
            32 => {
                let mut a = [0u8; 16];
                let mut m = [0u8; 16];
                a.copy_from_slice(&b[..16]);
                m.copy_from_slice(&b[16..]);
                Some(Self {
                    base: IPAddress::V6(Ipv6Addr::from(a)),
                    mask: IPAddress::V6(Ipv6Addr::from(m)),
                })
            }
            _ => None,
        }
    }

    pub fn contains(&self, addr: &IPAddress) -> bool {
        match (self.base, self.mask, addr) {
            (IPAddress::V4(base), IPAddress::V4(mask), IPAddress::V4(addr)) => {
                u32::from(base) & u32::from(mask) == u32::from(*addr) & u32::from(mask)
            }
            (IPAddress::V6(base), IPAddress::V6(mask), IPAddress::V6(addr)) => {
                u128::from(base) & u128::from(mask) == u128::from(*addr) & u128::from(mask)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_pattern_matches() {
        let wildcard = DNSPattern::new("*.example.com").unwrap();
        assert!(wildcard.matches(&DNSName::new("foo.example.com").unwrap()));
        assert!(!wildcard.matches(&DNSName::new("example.com").unwrap()));
        assert!(!wildcard.matches(&DNSName::new("foo.bar.example.com").unwrap()));
    }

    #[test]
    fn test_subdomain_of_or_eq() {
        let base = DNSName::new("example.com").unwrap();
        assert!(DNSName::new("example.com").unwrap().is_subdomain_of_or_eq(&base));
        assert!(DNSName::new("foo.example.com").unwrap().is_subdomain_of_or_eq(&base));
        assert!(!DNSName::new("notexample.com").unwrap().is_subdomain_of_or_eq(&base));
    }

    #[test]
    fn test_ip_mask_contains() {
        let mask = IPAddressMask::from_bytes(&[10, 0, 0, 0, 255, 255, 255, 0]).unwrap();
        assert!(mask.contains(&IPAddress::from_str("10.0.0.42").unwrap()));
        assert!(!mask.contains(&IPAddress::from_str("10.0.1.42").unwrap()));
    }
}
