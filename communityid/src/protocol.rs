use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Transport protocols a Community ID can be computed for.
/// <https://www.iana.org/assignments/protocol-numbers/protocol-numbers.xhtml>
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Transmission Control
    Tcp = 6,
    /// User Datagram
    Udp = 17,
    /// Stream Control Transmission Protocol
    Sctp = 132,
}

impl Protocol {
    /// One-byte IANA protocol number fed into the digest.
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns human-readable string representation of the protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Sctp => "sctp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<u8> for Protocol {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        match number {
            6 => Ok(Protocol::Tcp),
            17 => Ok(Protocol::Udp),
            132 => Ok(Protocol::Sctp),
            other => Err(Error::unsupported_protocol(other.to_string())),
        }
    }
}

/// Accepts a protocol name (case-insensitive) or its decimal IANA number.
impl FromStr for Protocol {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        if let Ok(number) = tag.parse::<u8>() {
            return Protocol::try_from(number);
        }
        match tag.to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "sctp" => Ok(Protocol::Sctp),
            _ => Err(Error::unsupported_protocol(tag)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Protocol;
    use crate::error::Error;

    #[test]
    fn numbers_match_iana_assignments() {
        assert_eq!(Protocol::Tcp.number(), 6);
        assert_eq!(Protocol::Udp.number(), 17);
        assert_eq!(Protocol::Sctp.number(), 132);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("tcp".parse::<Protocol>(), Ok(Protocol::Tcp));
        assert_eq!("UDP".parse::<Protocol>(), Ok(Protocol::Udp));
        assert_eq!("Sctp".parse::<Protocol>(), Ok(Protocol::Sctp));
    }

    #[test]
    fn parses_iana_numbers() {
        assert_eq!("6".parse::<Protocol>(), Ok(Protocol::Tcp));
        assert_eq!("132".parse::<Protocol>(), Ok(Protocol::Sctp));
        assert_eq!(Protocol::try_from(17), Ok(Protocol::Udp));
    }

    #[test]
    fn rejects_protocols_outside_the_table() {
        assert_eq!(
            "icmp".parse::<Protocol>(),
            Err(Error::UnsupportedProtocol("icmp".to_string()))
        );
        assert_eq!(
            Protocol::try_from(1),
            Err(Error::UnsupportedProtocol("1".to_string()))
        );
        assert!("".parse::<Protocol>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for proto in [Protocol::Tcp, Protocol::Udp, Protocol::Sctp] {
            assert_eq!(proto.to_string().parse::<Protocol>(), Ok(proto));
        }
    }
}
