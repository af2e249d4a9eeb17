//! Community ID flow hashing.
//!
//! A Community ID is a direction-independent fingerprint of a network flow,
//! `"1:"` followed by the base64 or hex encoded SHA-1 digest of the flow's
//! canonically ordered endpoints, transport protocol and a 16-bit seed.
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use communityid::{CommunityIdGenerator, Protocol};
//!
//! let generator = CommunityIdGenerator::default();
//! let id = generator
//!     .generate(
//!         Protocol::Tcp,
//!         Ipv4Addr::new(128, 232, 110, 120),
//!         34855,
//!         Ipv4Addr::new(66, 35, 250, 204),
//!         80,
//!     )
//!     .unwrap();
//! assert_eq!(id, "1:LQU9qZlK+B5F3KDmev6m5PMibrg=");
//! ```

pub mod community_id;
pub mod endpoint;
pub mod error;
pub mod flow;
pub mod protocol;

pub use crate::{
    community_id::{CommunityId, CommunityIdGenerator, Encoding},
    endpoint::{Address, Endpoint, canonical_order},
    error::{Error, Result},
    flow::FlowTuple,
    protocol::Protocol,
};
