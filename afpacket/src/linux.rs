/// Every protocol, as passed to `socket(2)` before byte swapping.
pub const ETH_P_ALL: u16 = libc::ETH_P_ALL as u16;
/// Address Resolution Protocol frames only.
pub const ETH_P_ARP: u16 = libc::ETH_P_ARP as u16;

/// `sll_pkttype` of frames this host sent itself.
pub(crate) const PACKET_OUTGOING: libc::c_uchar = 4;
