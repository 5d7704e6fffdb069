use crate::addr::validate_ip;
use crate::error::Result;
use crate::interface::{self, Interface};
use crate::transport::{Link, Transport};
use crate::Arping;
use arping_packets::ArpFrame;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;

impl<L: Link> Arping<L> {
    /// Announces `src` on the interface whose network contains it. Nothing is awaited back.
    pub async fn gratuitous_arp(&self, src: impl Into<IpAddr>) -> Result<()> {
        let src = validate_ip(src)?;
        let iface = interface::find_usable_interface(src)?;
        self.announce(src, &iface).await
    }

    /// Announces `src` on the interface called `iface_name`.
    pub async fn gratuitous_arp_over_interface_by_name(
        &self,
        src: impl Into<IpAddr>,
        iface_name: &str,
    ) -> Result<()> {
        let src = validate_ip(src)?;
        let iface = Interface::by_name(iface_name)?;
        self.announce(src, &iface).await
    }

    /// Announces `src` on `iface`.
    pub async fn gratuitous_arp_over_interface(
        &self,
        src: impl Into<IpAddr>,
        iface: &Interface,
    ) -> Result<()> {
        let src = validate_ip(src)?;
        self.announce(src, iface).await
    }

    async fn announce(&self, src: Ipv4Addr, iface: &Interface) -> Result<()> {
        let src_mac = iface.hardware_addr()?;
        // sender and target protocol address are both ours
        let announcement = ArpFrame::request(src_mac, src, src);

        let mut transport = self.link.open(iface)?;
        debug!(
            "gratuitous arp over interface: '{}' with address: '{}'",
            iface.name, src
        );
        let sent = transport.send(&announcement.to_bytes()).await;
        transport.close();
        sent.map(|_| ())
    }
}
