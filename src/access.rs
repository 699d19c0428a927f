//! Network-origin access control.
//!
//! The dashboard has no login; it is only reachable from peers inside an
//! allow-list of CIDR ranges (by default the RFC 1918 private ranges and
//! loopback). Loopback peers are always allowed.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

/// Ranges allowed when no list is configured.
pub const DEFAULT_ALLOW_CIDRS: &str = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32";

/// Errors from parsing a CIDR range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CidrError {
    /// Missing `/prefix` part.
    #[error("missing prefix length in {0:?}")]
    MissingPrefix(String),

    /// The address part is not an IP address.
    #[error("invalid address in {0:?}")]
    InvalidAddress(String),

    /// The prefix length is not a number or too long for the address family.
    #[error("invalid prefix length in {0:?}")]
    InvalidPrefix(String),
}

/// An IPv4 or IPv6 network in CIDR notation, e.g. `192.168.0.0/16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    network: IpAddr,
    prefix: u8,
}

impl Cidr {
    /// Returns true if `ip` lies within this network.
    ///
    /// Addresses of the other family never match.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = mask_u32(self.prefix);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = mask_u128(self.prefix);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

fn mask_u32(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p => u32::MAX << (32 - u32::from(p)),
    }
}

fn mask_u128(prefix: u8) -> u128 {
    match prefix {
        0 => 0,
        p => u128::MAX << (128 - u32::from(p)),
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| CidrError::MissingPrefix(s.to_string()))?;
        let network: IpAddr = addr
            .parse()
            .map_err(|_| CidrError::InvalidAddress(s.to_string()))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| CidrError::InvalidPrefix(s.to_string()))?;

        let max = match network {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max {
            return Err(CidrError::InvalidPrefix(s.to_string()));
        }

        Ok(Self { network, prefix })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// The set of networks allowed to use the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    cidrs: Vec<Cidr>,
}

impl AccessList {
    /// Parse a comma-separated list of CIDR ranges.
    ///
    /// Blank entries are ignored. Malformed entries are logged and skipped
    /// rather than rejected, so one typo does not lock everybody out.
    pub fn parse(list: &str) -> Self {
        let cidrs = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match entry.parse::<Cidr>() {
                Ok(cidr) => Some(cidr),
                Err(e) => {
                    warn!("Ignoring allow-list entry: {}", e);
                    None
                }
            })
            .collect();
        Self { cidrs }
    }

    /// The parsed ranges.
    pub fn cidrs(&self) -> &[Cidr] {
        &self.cidrs
    }

    /// Returns true if a peer at `ip` may use the dashboard.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are checked as IPv4.
    pub fn allows(&self, ip: IpAddr) -> bool {
        let ip = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
            v4 => v4,
        };
        ip.is_loopback() || self.cidrs.iter().any(|cidr| cidr.contains(ip))
    }
}
