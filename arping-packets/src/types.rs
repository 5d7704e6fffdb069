use std::fmt;
use std::str::FromStr;

pub type PacketData = Vec<u8>;

pub const ARP_ETHER_TYPE: u16 = 0x0806;
pub const IPV4_ETHER_TYPE: u16 = 0x0800;

/// Ethernet II header: destination MAC, source MAC, ethertype.
pub const ETHERNET_HEADER_LEN: usize = 14;

/// Smallest frame a NIC will put on the wire, not counting the 4 byte FCS.
pub const ETHERNET_MIN_FRAME_LEN: usize = 60;

pub const MAC_ADDR_LEN: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MacAddr {
    pub bytes: [u8; MAC_ADDR_LEN],
}

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr {
        bytes: [0xff; MAC_ADDR_LEN],
    };

    pub const fn new(bytes: [u8; MAC_ADDR_LEN]) -> MacAddr {
        MacAddr { bytes }
    }

    pub fn is_broadcast(&self) -> bool {
        *self == MacAddr::BROADCAST
    }
}

impl From<[u8; MAC_ADDR_LEN]> for MacAddr {
    fn from(bytes: [u8; MAC_ADDR_LEN]) -> Self {
        MacAddr::new(bytes)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = &'static str;

    /// Parses `aa:bb:cc:dd:ee:ff`. Every group must be exactly two hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; MAC_ADDR_LEN];
        let mut groups = s.split(':');
        for byte in bytes.iter_mut() {
            let group = groups.next().ok_or("MAC address must have 6 groups")?;
            if group.len() != 2 {
                return Err("MAC address group must be 2 hex digits");
            }
            *byte = u8::from_str_radix(group, 16).map_err(|_| "MAC address group is not hex")?;
        }
        if groups.next().is_some() {
            return Err("MAC address must have 6 groups");
        }
        Ok(MacAddr::new(bytes))
    }
}
