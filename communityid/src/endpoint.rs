//! Flow endpoints and their canonical ordering.
//!
//! An [`Endpoint`] is an address/port pair. Endpoints are totally ordered by
//! address (as an unsigned big-endian integer) and then by port, which lets the
//! two sides of a flow be labelled "first" and "second" independently of the
//! direction they were observed in.

use std::{
    cmp::Ordering,
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

use crate::error::{Error, Result};

const IPV4_LEN: usize = 4;
const IPV6_LEN: usize = 16;

/// Raw network address bytes in network byte order: 4 bytes for IPv4 or 16
/// bytes for IPv6.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    octets: [u8; IPV6_LEN],
    len: u8,
}

impl Address {
    /// The address bytes exactly as they are fed to the digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.octets[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_ipv4(&self) -> bool {
        self.len() == IPV4_LEN
    }

    /// Address interpreted as an unsigned integer, most significant byte first.
    pub fn to_u128(&self) -> u128 {
        self.as_bytes()
            .iter()
            .fold(0u128, |acc, b| (acc << 8) | u128::from(*b))
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            0 => Err(Error::invalid_argument("address must not be empty")),
            IPV4_LEN | IPV6_LEN => {
                let mut octets = [0u8; IPV6_LEN];
                octets[..bytes.len()].copy_from_slice(bytes);
                Ok(Address {
                    octets,
                    len: bytes.len() as u8,
                })
            }
            n => Err(Error::invalid_argument(format!(
                "address must be 4 or 16 bytes long, got {n}"
            ))),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        let mut octets = [0u8; IPV6_LEN];
        octets[..IPV4_LEN].copy_from_slice(&addr.octets());
        Address {
            octets,
            len: IPV4_LEN as u8,
        }
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address {
            octets: addr.octets(),
            len: IPV6_LEN as u8,
        }
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> Self {
        if addr.is_ipv4() {
            let mut octets = [0u8; IPV4_LEN];
            octets.copy_from_slice(addr.as_bytes());
            IpAddr::V4(Ipv4Addr::from(octets))
        } else {
            IpAddr::V6(Ipv6Addr::from(addr.octets))
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&IpAddr::from(*self), f)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        // Equal integer values only occur across families (e.g. 0.0.0.1 and ::1);
        // the shorter encoding sorts first so the order agrees with `Eq`.
        self.to_u128()
            .cmp(&other.to_u128())
            .then_with(|| self.len.cmp(&other.len))
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One side of a flow. Ordered by address first, then by port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    address: Address,
    port: u64,
}

impl Endpoint {
    /// Builds an endpoint, rejecting negative ports.
    ///
    /// Ports wider than 16 bits are accepted; only their low 16 bits reach the
    /// digest, but ordering uses the full value.
    pub fn new(address: impl Into<Address>, port: impl Into<i64>) -> Result<Self> {
        let port = u64::try_from(port.into())
            .map_err(|_| Error::invalid_argument("port number must be a positive integer"))?;
        Ok(Endpoint {
            address: address.into(),
            port,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn port(&self) -> u64 {
        self.port
    }

    /// Port as the two big-endian bytes that are hashed.
    pub fn port_bytes(&self) -> [u8; 2] {
        (self.port as u16).to_be_bytes()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.address.is_ipv4() {
            write!(f, "{}:{}", self.address, self.port)
        } else {
            write!(f, "[{}]:{}", self.address, self.port)
        }
    }
}

/// Orders a flow's two endpoints so the smaller one comes first. Equal
/// endpoints keep the order they were given in.
pub fn canonical_order(source: Endpoint, destination: Endpoint) -> (Endpoint, Endpoint) {
    if source > destination {
        (destination, source)
    } else {
        (source, destination)
    }
}
