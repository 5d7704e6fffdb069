//! Error types for arping

use std::io;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Result type alias for arping operations
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a ping or an announcement can fail with.
#[derive(Error, Debug)]
pub enum Error {
    /// The address given is not IPv4
    #[error("not a valid v4 address: {0}")]
    InvalidAddress(String),

    /// No interface with that name
    #[error("interface '{0}' not found")]
    InterfaceNotFound(String),

    /// No local network contains the destination
    #[error("no usable interface found for {0}")]
    NoUsableInterface(Ipv4Addr),

    /// The chosen interface has no address in the destination's network
    #[error("iface: '{iface}' can't reach ip: '{ip}'")]
    Unreachable { iface: String, ip: Ipv4Addr },

    /// The chosen interface has no link-layer address to send from
    #[error("interface '{0}' has no hardware address")]
    NoHardwareAddr(String),

    /// Raw sockets need root or CAP_NET_RAW
    #[error("no raw socket access on '{iface}' (root or cap_net_raw required): {source}")]
    NoRawAccess {
        iface: String,
        #[source]
        source: io::Error,
    },

    /// The raw channel could not be bound to the interface
    #[error("interface '{iface}' unavailable: {source}")]
    InterfaceUnavailable {
        iface: String,
        #[source]
        source: io::Error,
    },

    /// Sending or receiving on an open raw channel failed
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// Nobody answered before the deadline
    #[error("timeout")]
    Timeout,
}

/// Coarse classification of [`Error`], for callers that only need to branch on the kind of
/// failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Bad input, detected before any I/O.
    Validation,
    /// No local interface or address fits the request.
    Resolution,
    /// Opening, writing to or reading from the raw channel failed.
    Transport,
    /// The target did not answer in time. Not a fault.
    Timeout,
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::InvalidAddress(_) => Category::Validation,
            Error::InterfaceNotFound(_)
            | Error::NoUsableInterface(_)
            | Error::Unreachable { .. }
            | Error::NoHardwareAddr(_) => Category::Resolution,
            Error::NoRawAccess { .. } | Error::InterfaceUnavailable { .. } | Error::Transport(_) => {
                Category::Transport
            }
            Error::Timeout => Category::Timeout,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout)
    }

    /// Classifies a failure to open the raw channel on `iface`.
    pub(crate) fn open_failed(iface: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => Error::NoRawAccess {
                iface: iface.to_string(),
                source,
            },
            _ => Error::InterfaceUnavailable {
                iface: iface.to_string(),
                source,
            },
        }
    }
}
