//! The raw frame channel a ping runs over.
//!
//! The orchestrator only talks to [`Transport`]; which backend provides it is picked by the
//! [`Link`] handed to [`Arping`](crate::Arping). Linux gets [`AfPacketLink`].

use crate::error::Result;
use crate::interface::Interface;
use async_trait::async_trait;
use tokio::time::Instant;

#[cfg(target_os = "linux")]
mod af_packet;
#[cfg(target_os = "linux")]
pub use self::af_packet::{AfPacketLink, AfPacketTransport};

/// A bidirectional link-layer channel bound to one interface.
#[async_trait]
pub trait Transport: Send {
    /// Transmits one complete Ethernet frame. Returns when the frame left, which is where
    /// round trip times are measured from.
    async fn send(&mut self, frame: &[u8]) -> Result<Instant>;

    /// Waits for the next frame on the channel, whatever its protocol.
    ///
    /// There is no timeout here; callers race this against their own deadline, so dropping the
    /// returned future must be safe at any await point.
    async fn receive(&mut self) -> Result<(Vec<u8>, Instant)>;

    /// Releases the channel. Calling it again is a no-op.
    fn close(&mut self);
}

/// Opens [`Transport`]s on a given interface.
pub trait Link: Send + Sync {
    type Transport: Transport + 'static;

    fn open(&self, iface: &Interface) -> Result<Self::Transport>;
}
