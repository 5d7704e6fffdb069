//! Discovers the hardware address of a host on the local segment by ARP, bypassing the kernel's
//! neighbour cache, and sends gratuitous ARP announcements.
//!
//! Sending and receiving raw frames needs root, or `CAP_NET_RAW` on Linux:
//! `sudo setcap cap_net_raw+ep <BIN>`.

mod addr;
mod config;
mod error;
mod gratuitous;
pub mod interface;
mod ping;
pub mod transport;

pub use addr::{parse_ipv4, validate_ip};
pub use arping_packets::MacAddr;
pub use config::{Config, DEFAULT_TIMEOUT};
pub use error::{Category, Error, Result};
pub use interface::{Interface, InterfaceAddr};
pub use ping::{Arping, PingResult};
