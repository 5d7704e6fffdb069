//! Bindings for Linux `AF_PACKET` sockets, with an optional tokio wrapper.
#![cfg(target_os = "linux")]
mod linux;
mod sockets;

#[cfg(feature = "tokio-support")]
mod tokio_sockets;

pub use linux::{ETH_P_ALL, ETH_P_ARP};
pub use sockets::{Addr, BoundSocket, Socket};
#[cfg(feature = "tokio-support")]
pub use tokio_sockets::AsyncBoundSocket;
