#![deny(missing_docs)]

use crate::linux;
use std::{
    ffi::CStr,
    io, mem,
    os::unix::io::{AsRawFd, RawFd},
};

/// The link-layer address a frame was received from.
pub struct Addr {
    inner: libc::sockaddr_ll,
}

impl Addr {
    /// Returns true if the frame was sent by this host and looped back to us by the kernel.
    pub fn is_outgoing(&self) -> bool {
        self.inner.sll_pkttype == linux::PACKET_OUTGOING
    }

    /// Index of the interface the frame was seen on.
    pub fn ifindex(&self) -> i32 {
        self.inner.sll_ifindex
    }
}

/// An `AF_PACKET` socket that is not bound to an interface yet. It can still be configured.
pub struct Socket {
    fd: libc::c_int,
    protocol: u16,
}

/// An `AF_PACKET` socket bound to one interface. Frames can be sent and received through it.
pub struct BoundSocket {
    fd: libc::c_int,
    link: libc::sockaddr_ll,
}

/// Turns the `-1` convention of libc calls into an `io::Result`.
fn check<T: Copy + PartialOrd + Default>(ret: T) -> io::Result<T> {
    if ret < T::default() {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret)
    }
}

fn ll_len() -> libc::socklen_t {
    mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t
}

impl Socket {
    /// Opens a raw socket that only sees frames of the given ethertype, e.g.
    /// [`ETH_P_ARP`](crate::ETH_P_ARP). Pass [`ETH_P_ALL`](crate::ETH_P_ALL) to see everything.
    ///
    /// Needs `CAP_NET_RAW`; without it this fails with `PermissionDenied`.
    pub fn new(protocol: u16) -> io::Result<Self> {
        // Resources:
        // man 7 packet
        let fd = check(unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW | libc::SOCK_CLOEXEC,
                protocol.to_be() as libc::c_int,
            )
        })?;
        Ok(Socket { fd, protocol })
    }

    /// Binds the socket to the interface called `iface`. Consumes the `Socket`, nothing may be
    /// reconfigured after this.
    pub fn bind(self, iface: impl AsRef<CStr>) -> io::Result<BoundSocket> {
        let name = iface.as_ref();
        if name.to_bytes_with_nul().len() > libc::IFNAMSIZ {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "interface name is longer than IFNAMSIZ",
            ));
        }

        // Resources:
        // man 3 if_nametoindex
        let ifindex = unsafe { libc::if_nametoindex(name.as_ptr()) };
        if ifindex == 0 {
            return Err(io::Error::last_os_error());
        }

        // Resources:
        // man 7 packet regarding sockaddr_ll
        let mut link: libc::sockaddr_ll = unsafe { mem::zeroed() };
        link.sll_family = libc::AF_PACKET as libc::c_ushort;
        link.sll_protocol = self.protocol.to_be();
        link.sll_ifindex = ifindex as libc::c_int;
        check(unsafe {
            libc::bind(
                self.fd,
                &link as *const libc::sockaddr_ll as *const libc::sockaddr,
                ll_len(),
            )
        })?;

        let fd = self.fd;
        // the descriptor moves into the BoundSocket
        mem::forget(self);
        Ok(BoundSocket { fd, link })
    }

    /// Switches `O_NONBLOCK` on or off.
    pub fn set_nonblocking(&mut self, nonblocking: bool) -> io::Result<()> {
        // Resources:
        // man 2 fcntl
        let flags = check(unsafe { libc::fcntl(self.fd, libc::F_GETFL) })?;
        let flags = if nonblocking {
            flags | libc::O_NONBLOCK
        } else {
            flags & !libc::O_NONBLOCK
        };
        check(unsafe { libc::fcntl(self.fd, libc::F_SETFL, flags) })?;
        Ok(())
    }
}

impl BoundSocket {
    /// Index of the interface this socket is bound to.
    pub fn ifindex(&self) -> i32 {
        self.link.sll_ifindex
    }

    /// Puts a frame on the wire. The frame must carry its own Ethernet header.
    pub fn send(&mut self, frame: &[u8]) -> io::Result<usize> {
        // The kernel reads at most frame.len() bytes from the borrowed slice.
        let sent = check(unsafe {
            libc::sendto(
                self.fd,
                frame.as_ptr() as *const libc::c_void,
                frame.len(),
                0,
                &self.link as *const libc::sockaddr_ll as *const libc::sockaddr,
                ll_len(),
            )
        })?;
        Ok(sent as usize)
    }

    /// Takes the next frame off the wire. Frames longer than `frame` are truncated.
    pub fn recv(&mut self, frame: &mut [u8]) -> io::Result<(usize, Addr)> {
        let mut from: libc::sockaddr_ll = unsafe { mem::zeroed() };
        let mut from_len = ll_len();
        // The kernel writes at most frame.len() bytes and at most from_len address bytes.
        let received = check(unsafe {
            libc::recvfrom(
                self.fd,
                frame.as_mut_ptr() as *mut libc::c_void,
                frame.len(),
                0,
                &mut from as *mut libc::sockaddr_ll as *mut libc::sockaddr,
                &mut from_len,
            )
        })?;
        Ok((received as usize, Addr { inner: from }))
    }
}

impl AsRawFd for BoundSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}

impl Drop for BoundSocket {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}
