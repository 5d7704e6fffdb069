use crate::sockets::{self, Addr};
use std::{ffi::CStr, io};
use tokio::io::unix::AsyncFd;

/// Represents a bound `AF_PACKET` socket for use with Tokio. At this phase in a
/// socket's lifecycle, it can be read and written from.
///
/// The socket is registered with the reactor in non-blocking mode, so a pending
/// [`recv`](AsyncBoundSocket::recv) can be abandoned at any point by dropping its future.
pub struct AsyncBoundSocket {
    sock: AsyncFd<sockets::BoundSocket>,
}

impl AsyncBoundSocket {
    /// Constructs an `AsyncBoundSocket` for the given ethertype on a network interface.
    /// Must be called from within a Tokio runtime.
    pub fn from_interface(iface: impl AsRef<CStr>, protocol: u16) -> io::Result<Self> {
        let mut sock = sockets::Socket::new(protocol)?;
        sock.set_nonblocking(true)?;
        let sock = sock.bind(iface)?;
        Ok(Self {
            sock: AsyncFd::new(sock)?,
        })
    }

    /// Index of the interface this socket is bound to.
    pub fn ifindex(&self) -> i32 {
        self.sock.get_ref().ifindex()
    }

    /// Sends a frame, waiting for room in the transmit queue if needed.
    pub async fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        loop {
            let mut guard = self.sock.writable_mut().await?;
            match guard.try_io(|sock| sock.get_mut().send(frame)) {
                Ok(result) => return result,
                Err(_would_block) => continue,
            }
        }
    }

    /// Waits for the next frame and copies it into `frame`.
    pub async fn recv(&mut self, frame: &mut [u8]) -> io::Result<(usize, Addr)> {
        loop {
            let mut guard = self.sock.readable_mut().await?;
            match guard.try_io(|sock| sock.get_mut().recv(frame)) {
                Ok(result) => return result,
                Err(_would_block) => continue,
            }
        }
    }
}
