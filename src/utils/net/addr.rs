//! Address helpers: outbound interface discovery and CIDR blocks

use crate::utils::error::MetricsError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use tokio::net::UdpSocket;

/// Public resolver used only as a routing target; no datagram is ever sent
pub const DEFAULT_PROBE_TARGET: &str = "77.88.55.80:53";

/// Best-effort local address of the interface that routes to `probe`
///
/// Connecting a UDP socket picks a route without putting anything on the wire.
/// Returns `None` when there is no route (offline hosts, sandboxes).
pub async fn outbound_ip(probe: &str) -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await.ok()?;
    socket.connect(probe).await.ok()?;
    socket.local_addr().ok().map(|addr| addr.ip())
}

/// An IPv4 or IPv6 network in CIDR notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpNet {
    network: IpAddr,
    prefix: u8,
}

impl IpNet {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, MetricsError> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max {
            return Err(MetricsError::config(format!(
                "prefix /{} is too long for {}",
                prefix, addr
            )));
        }
        let network = match addr {
            IpAddr::V4(v4) => IpAddr::V4(Ipv4Addr::from(u32::from(v4) & v4_mask(prefix))),
            IpAddr::V6(v6) => IpAddr::V6(Ipv6Addr::from(u128::from(v6) & v6_mask(prefix))),
        };
        Ok(Self { network, prefix })
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Whether `ip` falls inside this network; families never mix
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.network, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                u32::from(*ip) & v4_mask(self.prefix) == u32::from(net)
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                u128::from(*ip) & v6_mask(self.prefix) == u128::from(net)
            }
            _ => false,
        }
    }
}

impl FromStr for IpNet {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| MetricsError::config(format!("'{}' is not in CIDR notation", s)))?;
        let addr = IpAddr::from_str(addr)
            .map_err(|e| MetricsError::config(format!("invalid network address '{}': {}", addr, e)))?;
        let prefix = prefix
            .parse::<u8>()
            .map_err(|e| MetricsError::config(format!("invalid prefix '{}': {}", prefix, e)))?;
        Self::new(addr, prefix)
    }
}

impl std::fmt::Display for IpNet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

fn v4_mask(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    }
}

fn v6_mask(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix))
    }
}
