use super::{Link, Transport};
use crate::error::{Error, Result};
use crate::interface::Interface;
use async_trait::async_trait;
use std::{ffi::CString, io};
use tokio::time::Instant;
use tracing::debug;

// ARP frames are 60 bytes on the wire; anything longer is cut off, which is fine.
const MTU: usize = 1500;

/// Opens `AF_PACKET` sockets that only see ARP traffic.
#[derive(Clone, Copy, Debug, Default)]
pub struct AfPacketLink;

impl Link for AfPacketLink {
    type Transport = AfPacketTransport;

    fn open(&self, iface: &Interface) -> Result<AfPacketTransport> {
        let name = CString::new(iface.name.as_str()).map_err(|e| {
            Error::open_failed(&iface.name, io::Error::new(io::ErrorKind::InvalidInput, e))
        })?;
        let sock = afpacket::AsyncBoundSocket::from_interface(&name, afpacket::ETH_P_ARP)
            .map_err(|e| Error::open_failed(&iface.name, e))?;
        debug!(iface = %iface.name, ifindex = sock.ifindex(), "opened raw ARP socket");
        Ok(AfPacketTransport {
            sock: Some(sock),
            buf: vec![0; MTU],
        })
    }
}

pub struct AfPacketTransport {
    sock: Option<afpacket::AsyncBoundSocket>,
    buf: Vec<u8>,
}

fn closed() -> Error {
    io::Error::new(io::ErrorKind::NotConnected, "transport is closed").into()
}

#[async_trait]
impl Transport for AfPacketTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<Instant> {
        let sock = self.sock.as_mut().ok_or_else(closed)?;
        sock.send(frame).await?;
        Ok(Instant::now())
    }

    async fn receive(&mut self) -> Result<(Vec<u8>, Instant)> {
        loop {
            let sock = self.sock.as_mut().ok_or_else(closed)?;
            let (len, from) = sock.recv(&mut self.buf).await?;
            let received_at = Instant::now();
            // the kernel hands us our own transmissions too
            if from.is_outgoing() {
                continue;
            }
            return Ok((self.buf[..len].to_vec(), received_at));
        }
    }

    fn close(&mut self) {
        // dropping the socket deregisters it from the reactor and closes the descriptor
        self.sock.take();
    }
}
