//! Textual five-tuple input.
//!
//! A [`FlowTuple`] is parsed from a single whitespace separated line:
//! `<protocol> <src-addr> <src-port> <dst-addr> <dst-port>`.

use std::{net::IpAddr, str::FromStr};

use crate::{
    endpoint::Address,
    error::{Error, Result},
    protocol::Protocol,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTuple {
    pub protocol: Protocol,
    pub src_addr: Address,
    /// Signed so that negative input reaches the generator's port check.
    pub src_port: i64,
    pub dst_addr: Address,
    pub dst_port: i64,
}

impl FlowTuple {
    /// Builds a tuple from individually supplied fields, any of which may be missing.
    pub fn from_fields(
        protocol: Option<&str>,
        src_addr: Option<&str>,
        src_port: Option<&str>,
        dst_addr: Option<&str>,
        dst_port: Option<&str>,
    ) -> Result<Self> {
        let protocol: Protocol = required(protocol, "protocol")?.parse()?;
        Ok(FlowTuple {
            protocol,
            src_addr: parse_addr(required(src_addr, "source address")?)?,
            src_port: parse_port(required(src_port, "source port")?)?,
            dst_addr: parse_addr(required(dst_addr, "destination address")?)?,
            dst_port: parse_port(required(dst_port, "destination port")?)?,
        })
    }
}

impl FromStr for FlowTuple {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let flow = FlowTuple::from_fields(
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        )?;

        if let Some(extra) = fields.next() {
            return Err(Error::invalid_argument(format!(
                "unexpected trailing field '{extra}'"
            )));
        }
        Ok(flow)
    }
}

fn required<'a>(field: Option<&'a str>, name: &str) -> Result<&'a str> {
    field
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid_argument(format!("missing {name}")))
}

fn parse_addr(s: &str) -> Result<Address> {
    s.parse::<IpAddr>()
        .map(Address::from)
        .map_err(|e| Error::invalid_argument(format!("invalid address '{s}': {e}")))
}

fn parse_port(s: &str) -> Result<i64> {
    s.parse::<i64>()
        .map_err(|e| Error::invalid_argument(format!("invalid port '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::FlowTuple;
    use crate::{endpoint::Address, error::Error, protocol::Protocol};

    #[test]
    fn parses_a_complete_line() {
        let flow: FlowTuple = "tcp 128.232.110.120 34855 66.35.250.204 80".parse().unwrap();

        assert_eq!(flow.protocol, Protocol::Tcp);
        assert_eq!(
            flow.src_addr,
            Address::from(Ipv4Addr::new(128, 232, 110, 120))
        );
        assert_eq!(flow.src_port, 34855);
        assert_eq!(flow.dst_addr, Address::from(Ipv4Addr::new(66, 35, 250, 204)));
        assert_eq!(flow.dst_port, 80);
    }

    #[test]
    fn tolerates_extra_whitespace_and_ipv6() {
        let flow: FlowTuple = "  17\tfe80::1  5353   fe80::2 5353 ".parse().unwrap();

        assert_eq!(flow.protocol, Protocol::Udp);
        assert_eq!(flow.src_addr.len(), 16);
    }

    #[test]
    fn missing_fields_are_invalid_arguments() {
        assert_eq!(
            "".parse::<FlowTuple>(),
            Err(Error::InvalidArgument("missing protocol".to_string()))
        );
        assert_eq!(
            "udp 10.0.0.1 53".parse::<FlowTuple>(),
            Err(Error::InvalidArgument("missing destination address".to_string()))
        );
        assert_eq!(
            FlowTuple::from_fields(Some("tcp"), None, Some("1"), Some("10.0.0.2"), Some("2")),
            Err(Error::InvalidArgument("missing source address".to_string()))
        );
    }

    #[test]
    fn unknown_protocol_is_unsupported() {
        assert_eq!(
            "icmp 10.0.0.1 8 10.0.0.2 0".parse::<FlowTuple>(),
            Err(Error::UnsupportedProtocol("icmp".to_string()))
        );
    }

    #[test]
    fn negative_ports_parse_and_are_left_to_the_generator() {
        let flow: FlowTuple = "sctp 192.168.170.8 -7 192.168.170.56 80".parse().unwrap();
        assert_eq!(flow.src_port, -7);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "tcp 10.0.0 1 10.0.0.2 2".parse::<FlowTuple>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            "tcp 10.0.0.1 http 10.0.0.2 2".parse::<FlowTuple>(),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            "tcp 10.0.0.1 1 10.0.0.2 2 extra".parse::<FlowTuple>(),
            Err(Error::InvalidArgument(_))
        ));
    }
}
