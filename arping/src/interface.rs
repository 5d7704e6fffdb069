//! Picks the local interface and source address used to reach a destination.

use crate::error::{Error, Result};
use arping_packets::MacAddr;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

/// One IPv4 address assigned to an interface, with its netmask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl InterfaceAddr {
    pub fn new(ip: Ipv4Addr, netmask: Ipv4Addr) -> Self {
        InterfaceAddr { ip, netmask }
    }

    /// True if `ip` is inside this address' network.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let mask = u32::from(self.netmask);
        u32::from(self.ip) & mask == u32::from(ip) & mask
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub index: u32,
    pub mac: Option<MacAddr>,
    pub addrs: Vec<InterfaceAddr>,
    pub up: bool,
}

impl Interface {
    /// Looks up a local interface by name.
    pub fn by_name(name: &str) -> Result<Interface> {
        interfaces()
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
    }

    /// The address frames from this interface are sent from.
    pub fn hardware_addr(&self) -> Result<MacAddr> {
        self.mac
            .ok_or_else(|| Error::NoHardwareAddr(self.name.clone()))
    }

    /// The local address sharing a network with `dst`.
    pub fn ip_in_network_of(&self, dst: Ipv4Addr) -> Result<Ipv4Addr> {
        self.addrs
            .iter()
            .find(|addr| addr.contains(dst))
            .map(|addr| addr.ip)
            .ok_or_else(|| Error::Unreachable {
                iface: self.name.clone(),
                ip: dst,
            })
    }
}

/// Picks the first interface that is up and directly connected to `dst`.
pub fn find_usable_interface(dst: Ipv4Addr) -> Result<Interface> {
    let ifaces = interfaces();
    select_interface(&ifaces, dst)
        .cloned()
        .ok_or(Error::NoUsableInterface(dst))
}

pub(crate) fn select_interface(ifaces: &[Interface], dst: Ipv4Addr) -> Option<&Interface> {
    debug!("search usable interface for {}", dst);
    ifaces.iter().find(|iface| {
        let verdict = if !iface.up {
            "DOWN"
        } else if iface.ip_in_network_of(dst).is_err() {
            "OTHER NETWORK"
        } else {
            "USABLE"
        };
        debug!(iface = %iface.name, "{}", verdict);
        verdict == "USABLE"
    })
}

/// Lists the local interfaces with their IPv4 addresses and hardware address.
pub fn interfaces() -> Vec<Interface> {
    pnet_datalink::interfaces()
        .into_iter()
        .map(|link| Interface {
            name: link.name.clone(),
            index: link.index,
            mac: link
                .mac
                .map(|m| MacAddr::new([m.0, m.1, m.2, m.3, m.4, m.5])),
            addrs: link
                .ips
                .iter()
                .filter_map(|net| match (net.ip(), net.mask()) {
                    (IpAddr::V4(ip), IpAddr::V4(netmask)) => Some(InterfaceAddr::new(ip, netmask)),
                    _ => None,
                })
                .collect(),
            up: link.is_up(),
        })
        .fold(Vec::new(), |mut found, link| {
            absorb(&mut found, link);
            found
        })
}

/// Adds `link` to `found`, folding "eth0:1" style aliases into their parent interface.
fn absorb(found: &mut Vec<Interface>, mut link: Interface) {
    if let Some(colon) = link.name.find(':') {
        link.name.truncate(colon);
    }
    match found.iter_mut().find(|iface| iface.name == link.name) {
        Some(iface) => {
            iface.up |= link.up;
            iface.mac = iface.mac.or(link.mac);
            iface.addrs.extend(link.addrs);
        }
        None => found.push(link),
    }
}
