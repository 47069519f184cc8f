//! Node addresses and the transport they resolve to

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

pub const PORT_NODE_PLAIN: u16 = 50211;
pub const PORT_NODE_TLS: u16 = 50212;
pub const PORT_MIRROR_TLS: u16 = 443;
pub const PORT_MIRROR_PLAIN: u16 = 5600;

const IN_PROCESS_PREFIX: &str = "in-process:";

/// Immutable description of a reachable service address.
///
/// Two addresses are equal iff their connection target strings match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeAddress {
    /// Host name or IP literal plus port
    Remote { host: String, port: u16 },
    /// Named endpoint served inside this process
    InProcess { name: String },
}

impl NodeAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::Remote {
            host: host.into(),
            port,
        }
    }

    pub fn in_process(name: impl Into<String>) -> Self {
        Self::InProcess { name: name.into() }
    }

    pub fn host(&self) -> Option<&str> {
        match self {
            Self::Remote { host, .. } => Some(host),
            Self::InProcess { .. } => None,
        }
    }

    pub fn port(&self) -> Option<u16> {
        match self {
            Self::Remote { port, .. } => Some(*port),
            Self::InProcess { .. } => None,
        }
    }

    pub fn is_in_process(&self) -> bool {
        matches!(self, Self::InProcess { .. })
    }

    /// Whether the port is one of the well-known TLS ports.
    pub fn is_transport_security(&self) -> bool {
        matches!(
            self,
            Self::Remote {
                port: PORT_NODE_TLS | PORT_MIRROR_TLS,
                ..
            }
        )
    }

    /// Same host on the TLS node port; other ports are kept as they are.
    pub fn to_secure(&self) -> Self {
        match self {
            Self::Remote {
                host,
                port: PORT_NODE_PLAIN,
            } => Self::new(host.clone(), PORT_NODE_TLS),
            other => other.clone(),
        }
    }

    /// Same host on the plaintext node port; other ports are kept as they are.
    pub fn to_insecure(&self) -> Self {
        match self {
            Self::Remote {
                host,
                port: PORT_NODE_TLS,
            } => Self::new(host.clone(), PORT_NODE_PLAIN),
            other => other.clone(),
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { host, port } if host.contains(':') => write!(f, "[{}]:{}", host, port),
            Self::Remote { host, port } => write!(f, "{}:{}", host, port),
            Self::InProcess { name } => write!(f, "{}{}", IN_PROCESS_PREFIX, name),
        }
    }
}

impl FromStr for NodeAddress {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(name) = s.strip_prefix(IN_PROCESS_PREFIX) {
            if name.is_empty() {
                return Err(ClientError::config("in-process address requires a name"));
            }
            return Ok(Self::in_process(name));
        }

        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| ClientError::config(format!("address `{}` is missing a port", s)))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(ClientError::config(format!("address `{}` is missing a host", s)));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| ClientError::config(format!("address `{}` has an invalid port", s)))?;
        Ok(Self::new(host, port))
    }
}

/// Transport a node dials, resolved once when the node is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    Plaintext,
    /// TLS pinned to `cert_hash` when known; `verify = false` trusts any certificate.
    Tls {
        cert_hash: Option<Vec<u8>>,
        verify: bool,
    },
    InProcess {
        name: String,
    },
}

impl TransportConfig {
    pub fn resolve(address: &NodeAddress, cert_hash: Option<&[u8]>, verify: bool) -> Self {
        match address {
            NodeAddress::InProcess { name } => Self::InProcess { name: name.clone() },
            remote if remote.is_transport_security() => Self::Tls {
                cert_hash: cert_hash.filter(|hash| !hash.is_empty()).map(<[u8]>::to_vec),
                verify,
            },
            _ => Self::Plaintext,
        }
    }
}
