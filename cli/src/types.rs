//! Application value types parsed from the command line.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use cmdtree_core::{BoxError, FromText};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CidrError {
    #[error("expected ADDRESS/PREFIX, got {0:?}")]
    MissingPrefix(String),
    #[error("invalid address {0:?}")]
    Address(String),
    #[error("invalid prefix length {prefix:?} for {family}")]
    Prefix { prefix: String, family: &'static str },
}

/// An IP network in CIDR notation, e.g. `10.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    /// The address as written (host bits may be set).
    pub addr: IpAddr,
    pub prefix: u8,
}

impl Cidr {
    pub fn parse(text: &str) -> Result<Self, CidrError> {
        let (addr, prefix) = text
            .split_once('/')
            .ok_or_else(|| CidrError::MissingPrefix(text.to_string()))?;
        let addr: IpAddr = addr
            .parse()
            .map_err(|_| CidrError::Address(addr.to_string()))?;

        let (max, family) = match addr {
            IpAddr::V4(_) => (32, "IPv4"),
            IpAddr::V6(_) => (128, "IPv6"),
        };
        let prefix = prefix
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= max)
            .ok_or_else(|| CidrError::Prefix {
                prefix: prefix.to_string(),
                family,
            })?;

        Ok(Self { addr, prefix })
    }

    /// The network address (host bits cleared).
    pub fn network(&self) -> IpAddr {
        match self.addr {
            IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask32(self.prefix))),
            IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask128(self.prefix))),
        }
    }

    /// Returns `true` if `ip` is inside the network. Address families never mix.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = mask32(self.prefix);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = mask128(self.prefix);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

fn mask32(prefix: u8) -> u32 {
    u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0)
}

fn mask128(prefix: u8) -> u128 {
    u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0)
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix)
    }
}

impl FromText for Cidr {
    fn from_text(text: &str) -> Result<Self, BoxError> {
        Ok(Self::parse(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_network() {
        let cidr = Cidr::parse("192.168.2.100/24").unwrap();
        assert_eq!(cidr.prefix, 24);
        assert_eq!(cidr.to_string(), "192.168.2.0/24");
    }

    #[test]
    fn test_contains() {
        let cidr = Cidr::parse("10.0.0.0/8").unwrap();
        assert!(cidr.contains("10.200.1.1".parse().unwrap()));
        assert!(!cidr.contains("11.0.0.1".parse().unwrap()));
        assert!(!cidr.contains("::1".parse().unwrap()));
    }

    #[test]
    fn test_zero_and_full_prefix() {
        let any = Cidr::parse("0.0.0.0/0").unwrap();
        assert!(any.contains("8.8.8.8".parse().unwrap()));

        let host = Cidr::parse("fe80::1/128").unwrap();
        assert!(host.contains("fe80::1".parse().unwrap()));
        assert!(!host.contains("fe80::2".parse().unwrap()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Cidr::parse("10.0.0.0"), Err(CidrError::MissingPrefix(_))));
        assert!(matches!(Cidr::parse("10.0.0/8"), Err(CidrError::Address(_))));
        assert!(matches!(
            Cidr::parse("10.0.0.0/33"),
            Err(CidrError::Prefix { family: "IPv4", .. })
        ));
    }
}
