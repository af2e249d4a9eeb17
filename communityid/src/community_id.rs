use std::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use tracing::trace;

use crate::{
    endpoint::{Address, Endpoint, canonical_order},
    error::{Error, Result},
    flow::FlowTuple,
    protocol::Protocol,
};

/// Reserved for a future flow label; always zero in version 1.
const PADDING: u8 = 0;

/// Length of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// How the digest is rendered after the `1:` version prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Standard base64 alphabet with `=` padding.
    #[default]
    Base64,
    /// Lowercase hexadecimal, two characters per byte.
    Hex,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "base64" => Ok(Encoding::Base64),
            "hex" => Ok(Encoding::Hex),
            other => Err(Error::invalid_argument(format!(
                "unknown encoding '{other}', expected 'base64' or 'hex'"
            ))),
        }
    }
}

/// A version 1 Community ID: the raw SHA-1 digest of a canonicalised flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommunityId {
    digest: [u8; DIGEST_LEN],
}

impl CommunityId {
    pub const VERSION: u8 = 1;

    pub fn digest(&self) -> &[u8; DIGEST_LEN] {
        &self.digest
    }

    /// Renders the ID as `"1:"` followed by the encoded digest.
    pub fn encode(&self, encoding: Encoding) -> String {
        let payload = match encoding {
            Encoding::Base64 => BASE64.encode(self.digest),
            Encoding::Hex => hex::encode(self.digest),
        };
        format!("{}:{payload}", Self::VERSION)
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(Encoding::Base64))
    }
}

/// Parses either encoding. The version is everything before the first `:`.
impl FromStr for CommunityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (version, payload) = s
            .split_once(':')
            .ok_or_else(|| Error::invalid_community_id("missing ':' version separator"))?;

        if version != Self::VERSION.to_string() {
            return Err(Error::invalid_community_id(format!(
                "unsupported version '{version}'"
            )));
        }

        let bytes = if payload.len() == DIGEST_LEN * 2 {
            hex::decode(payload).map_err(|e| Error::invalid_community_id(e.to_string()))?
        } else {
            BASE64
                .decode(payload)
                .map_err(|e| Error::invalid_community_id(e.to_string()))?
        };

        let digest: [u8; DIGEST_LEN] = bytes.as_slice().try_into().map_err(|_| {
            Error::invalid_community_id(format!(
                "digest must be {DIGEST_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(CommunityId { digest })
    }
}

/// Community ID generator with a fixed seed and output encoding.
///
/// The generator holds no mutable state; each call hashes with its own digest
/// context, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommunityIdGenerator {
    seed: u16,
    encoding: Encoding,
}

impl CommunityIdGenerator {
    /// Create a generator. Only the low 16 bits of `seed` are used.
    pub fn new(seed: u32, encoding: Encoding) -> Self {
        Self {
            seed: seed as u16,
            encoding,
        }
    }

    pub fn seed(&self) -> u16 {
        self.seed
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Generate the encoded Community ID for a flow.
    ///
    /// Swapping the source and destination endpoints yields the same ID.
    /// Fails with [`Error::InvalidArgument`] if either port is negative.
    pub fn generate(
        &self,
        protocol: Protocol,
        src_addr: impl Into<Address>,
        src_port: impl Into<i64>,
        dst_addr: impl Into<Address>,
        dst_port: impl Into<i64>,
    ) -> Result<String> {
        let id = self.generate_id(protocol, src_addr, src_port, dst_addr, dst_port)?;
        Ok(id.encode(self.encoding))
    }

    /// Same as [`generate`](Self::generate) but returns the undecoded digest.
    pub fn generate_id(
        &self,
        protocol: Protocol,
        src_addr: impl Into<Address>,
        src_port: impl Into<i64>,
        dst_addr: impl Into<Address>,
        dst_port: impl Into<i64>,
    ) -> Result<CommunityId> {
        let source = Endpoint::new(src_addr, src_port)?;
        let destination = Endpoint::new(dst_addr, dst_port)?;

        let (first, second) = canonical_order(source, destination);
        let digest = self.digest(protocol, &first, &second);

        trace!(
            event.name = "community_id.generated",
            network.transport = %protocol,
            flow.first = %first,
            flow.second = %second,
            seed = self.seed,
            "generated community id"
        );

        Ok(CommunityId { digest })
    }

    /// Generate the encoded Community ID for a parsed five-tuple.
    pub fn generate_flow(&self, flow: &FlowTuple) -> Result<String> {
        self.generate(
            flow.protocol,
            flow.src_addr,
            flow.src_port,
            flow.dst_addr,
            flow.dst_port,
        )
    }

    /// Hash input: seed, first addr, second addr, proto, padding, first port, second port.
    fn digest(&self, protocol: Protocol, first: &Endpoint, second: &Endpoint) -> [u8; DIGEST_LEN] {
        let mut hasher = Sha1::new();
        hasher.update(self.seed.to_be_bytes());
        hasher.update(first.address().as_bytes());
        hasher.update(second.address().as_bytes());
        hasher.update([protocol.number(), PADDING]);
        hasher.update(first.port_bytes());
        hasher.update(second.port_bytes());

        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}
