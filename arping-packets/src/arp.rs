use crate::*;
use std::convert::TryFrom;
use std::net::Ipv4Addr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl TryFrom<u16> for ArpOp {
    type Error = &'static str;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ArpOp::Request),
            2 => Ok(ArpOp::Reply),
            _ => Err("Unknown ARP opcode"),
        }
    }
}

pub enum ArpHardwareType {
    Ethernet = 1,
}

/// Ethernet hardware addresses, IPv4 protocol addresses.
pub const ARP_HARDWARE_ADDR_LEN: u8 = 6;
pub const ARP_PROTOCOL_ADDR_LEN: u8 = 4;

/// 8 fixed header bytes plus two (hardware, protocol) address pairs.
pub const ARP_PAYLOAD_LEN: usize =
    8 + 2 * ARP_HARDWARE_ADDR_LEN as usize + 2 * ARP_PROTOCOL_ADDR_LEN as usize;

/// Unpadded size of an ARP message in its Ethernet envelope.
pub const ARP_FRAME_LEN: usize = ETHERNET_HEADER_LEN + ARP_PAYLOAD_LEN;

const HARDWARE_TYPE_RANGE: (usize, usize) = (0, 2);
const PROTOCOL_TYPE_RANGE: (usize, usize) = (2, 4);
const HARDWARE_ADDR_LEN_RANGE: (usize, usize) = (4, 5);
const PROTOCOL_ADDR_LEN_RANGE: (usize, usize) = (5, 6);
const OPCODE_RANGE: (usize, usize) = (6, 8);
const SENDER_HARDWARE_ADDR_RANGE: (usize, usize) = (8, 14);
const SENDER_PROTOCOL_ADDR_RANGE: (usize, usize) = (14, 18);
const TARGET_HARDWARE_ADDR_RANGE: (usize, usize) = (18, 24);
const TARGET_PROTOCOL_ADDR_RANGE: (usize, usize) = (24, 28);

///
/// EthernetFrame wrapper with getters for the packet structure described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// Only Ethernet/IPv4 ARP is represented, so every address field sits at a fixed offset.
/// Frames are built once with `new` or checked once by `decode`, and never mutated after.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpFrame {
    frame: EthernetFrame,
}

impl ArpFrame {
    ///
    /// Builds an ARP message addressed to `target_mac` at the Ethernet layer. For discovery
    /// `target_mac` is `MacAddr::BROADCAST`; it is also written into the target hardware field.
    ///
    pub fn new(
        op: ArpOp,
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    ) -> Self {
        let mut frame = EthernetFrame::empty();
        frame.set_dest_mac(target_mac);
        frame.set_src_mac(sender_mac);
        frame.set_ether_type(ARP_ETHER_TYPE);
        frame.set_payload(&[0; ARP_PAYLOAD_LEN]);

        let mut arp_frame = ArpFrame { frame };
        arp_frame.set_arp_data(&(ArpHardwareType::Ethernet as u16).to_be_bytes(), HARDWARE_TYPE_RANGE);
        arp_frame.set_arp_data(&IPV4_ETHER_TYPE.to_be_bytes(), PROTOCOL_TYPE_RANGE);
        arp_frame.set_arp_data(&[ARP_HARDWARE_ADDR_LEN], HARDWARE_ADDR_LEN_RANGE);
        arp_frame.set_arp_data(&[ARP_PROTOCOL_ADDR_LEN], PROTOCOL_ADDR_LEN_RANGE);
        arp_frame.set_arp_data(&(op as u16).to_be_bytes(), OPCODE_RANGE);
        arp_frame.set_arp_data(&sender_mac.bytes, SENDER_HARDWARE_ADDR_RANGE);
        arp_frame.set_arp_data(&sender_ip.octets(), SENDER_PROTOCOL_ADDR_RANGE);
        arp_frame.set_arp_data(&target_mac.bytes, TARGET_HARDWARE_ADDR_RANGE);
        arp_frame.set_arp_data(&target_ip.octets(), TARGET_PROTOCOL_ADDR_RANGE);
        arp_frame
    }

    /// Shorthand for a broadcast who-has `target_ip`.
    pub fn request(sender_mac: MacAddr, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        ArpFrame::new(
            ArpOp::Request,
            sender_mac,
            sender_ip,
            MacAddr::BROADCAST,
            target_ip,
        )
    }

    ///
    /// Parses a frame as received from a raw link layer socket. Returns `None` for anything
    /// that is not an Ethernet/IPv4 ARP message; such traffic is expected on a raw socket and
    /// is not an error.
    ///
    pub fn decode(bytes: &[u8]) -> Option<ArpFrame> {
        EthernetFrame::from_buffer(bytes.to_vec())
            .and_then(ArpFrame::try_from)
            .ok()
    }

    /// Wire bytes, padded to the Ethernet minimum frame size.
    pub fn to_bytes(&self) -> PacketData {
        self.frame.to_padded_bytes()
    }

    pub fn hardware_type(&self) -> u16 {
        self.arp_u16(HARDWARE_TYPE_RANGE)
    }

    pub fn protocol_type(&self) -> u16 {
        self.arp_u16(PROTOCOL_TYPE_RANGE)
    }

    pub fn hardware_addr_len(&self) -> u8 {
        self.arp_data(HARDWARE_ADDR_LEN_RANGE)[0]
    }

    pub fn protocol_addr_len(&self) -> u8 {
        self.arp_data(PROTOCOL_ADDR_LEN_RANGE)[0]
    }

    pub fn opcode(&self) -> u16 {
        self.arp_u16(OPCODE_RANGE)
    }

    /// `None` for opcodes other than request and reply (RARP, InARP...).
    pub fn op(&self) -> Option<ArpOp> {
        ArpOp::try_from(self.opcode()).ok()
    }

    pub fn sender_hardware_addr(&self) -> &[u8] {
        self.arp_data(SENDER_HARDWARE_ADDR_RANGE)
    }

    pub fn sender_protocol_addr(&self) -> &[u8] {
        self.arp_data(SENDER_PROTOCOL_ADDR_RANGE)
    }

    pub fn target_hardware_addr(&self) -> &[u8] {
        self.arp_data(TARGET_HARDWARE_ADDR_RANGE)
    }

    pub fn target_protocol_addr(&self) -> &[u8] {
        self.arp_data(TARGET_PROTOCOL_ADDR_RANGE)
    }

    pub fn sender_mac(&self) -> MacAddr {
        self.arp_mac(SENDER_HARDWARE_ADDR_RANGE)
    }

    pub fn sender_ip(&self) -> Ipv4Addr {
        self.arp_ip(SENDER_PROTOCOL_ADDR_RANGE)
    }

    pub fn target_mac(&self) -> MacAddr {
        self.arp_mac(TARGET_HARDWARE_ADDR_RANGE)
    }

    pub fn target_ip(&self) -> Ipv4Addr {
        self.arp_ip(TARGET_PROTOCOL_ADDR_RANGE)
    }

    ///
    /// True if `self` answers `request`: a reply coming from the address that was asked for
    /// and directed at the address that asked. Hardware addresses are not compared, the
    /// responder's MAC is what we are looking for.
    ///
    pub fn is_response_of(&self, request: &ArpFrame) -> bool {
        self.op() == Some(ArpOp::Reply)
            && self.sender_protocol_addr() == request.target_protocol_addr()
            && self.target_protocol_addr() == request.sender_protocol_addr()
    }

    pub fn ethernet(&self) -> &EthernetFrame {
        &self.frame
    }

    // Returns the bytes of the ARP payload between start and end, exclusive
    fn arp_data(&self, (start, end): (usize, usize)) -> &[u8] {
        let offset = self.frame.payload_offset;
        &self.frame.data[offset + start..offset + end]
    }

    fn set_arp_data(&mut self, bytes: &[u8], (start, end): (usize, usize)) {
        let offset = self.frame.payload_offset;
        self.frame.data[offset + start..offset + end].copy_from_slice(bytes);
    }

    fn arp_u16(&self, range: (usize, usize)) -> u16 {
        let data = self.arp_data(range);
        u16::from_be_bytes([data[0], data[1]])
    }

    fn arp_mac(&self, range: (usize, usize)) -> MacAddr {
        let mut bytes = [0; MAC_ADDR_LEN];
        bytes.copy_from_slice(self.arp_data(range));
        MacAddr::new(bytes)
    }

    fn arp_ip(&self, range: (usize, usize)) -> Ipv4Addr {
        let data = self.arp_data(range);
        Ipv4Addr::new(data[0], data[1], data[2], data[3])
    }
}

impl TryFrom<EthernetFrame> for ArpFrame {
    type Error = &'static str;

    ///
    /// Decorates the given EthernetFrame with ArpFrame getters.
    /// Validates
    /// - The frame has an ARP ether type
    /// - The payload holds a full Ethernet/IPv4 ARP message (trailing padding is allowed)
    ///
    fn try_from(frame: EthernetFrame) -> Result<Self, Self::Error> {
        if frame.ether_type() != ARP_ETHER_TYPE {
            return Err("Frame does not have ARP ether type.");
        };

        if frame.payload().len() < ARP_PAYLOAD_LEN {
            return Err("Frame payload is too small");
        }

        let arp_frame = ArpFrame { frame };

        if arp_frame.hardware_addr_len() != ARP_HARDWARE_ADDR_LEN
            || arp_frame.protocol_addr_len() != ARP_PROTOCOL_ADDR_LEN
        {
            return Err("Frame is not an Ethernet/IPv4 ARP message");
        }

        if arp_frame.protocol_type() != IPV4_ETHER_TYPE {
            return Err("Frame protocol type is not IPv4");
        }

        Ok(arp_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const SENDER_MAC: MacAddr = MacAddr::new([1, 2, 3, 4, 5, 6]);
    const SENDER_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const TARGET_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);

    fn wire_frame(arp_payload: &[u8]) -> Vec<u8> {
        let mut ethernet_frame = EthernetFrame::empty();
        ethernet_frame.set_dest_mac(MacAddr::BROADCAST);
        ethernet_frame.set_src_mac(SENDER_MAC);
        ethernet_frame.set_ether_type(ARP_ETHER_TYPE);
        ethernet_frame.set_payload(arp_payload);
        ethernet_frame.data
    }

    fn reply(sender_mac: MacAddr, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> ArpFrame {
        ArpFrame::new(ArpOp::Reply, sender_mac, sender_ip, SENDER_MAC, target_ip)
    }

    #[test]
    fn request_layout() {
        let request = ArpFrame::request(SENDER_MAC, SENDER_IP, TARGET_IP);
        let bytes = request.to_bytes();
        assert_eq!(bytes.len(), ETHERNET_MIN_FRAME_LEN);
        assert_eq!(
            &bytes[..ARP_FRAME_LEN],
            &[
                0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0x08, 0x06, // ethernet
                0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, // htype ptype hlen plen op
                1, 2, 3, 4, 5, 6, 10, 0, 0, 1, // sender
                0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 10, 0, 0, 2, // target
            ][..]
        );
        assert!(bytes[ARP_FRAME_LEN..].iter().all(|b| *b == 0));
    }

    #[test]
    fn arp_frame_from_ethernet() {
        let arp_payload: Vec<u8> = vec![
            0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x02, 1, 2, 3, 4, 5, 6, 10, 0, 0, 1, 10, 9,
            8, 7, 6, 5, 0xff, 0xff, 0xff, 0xff,
        ];
        let arp_frame = ArpFrame::decode(&wire_frame(&arp_payload)).unwrap();
        assert_eq!(arp_frame.hardware_type(), ArpHardwareType::Ethernet as u16);
        assert_eq!(arp_frame.protocol_type(), IPV4_ETHER_TYPE);
        assert_eq!(arp_frame.hardware_addr_len(), 6);
        assert_eq!(arp_frame.protocol_addr_len(), 4);
        assert_eq!(arp_frame.op(), Some(ArpOp::Reply));
        assert_eq!(arp_frame.sender_hardware_addr(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(arp_frame.sender_protocol_addr(), [10, 0, 0, 1]);
        assert_eq!(arp_frame.target_hardware_addr(), [10, 9, 8, 7, 6, 5]);
        assert_eq!(arp_frame.target_protocol_addr(), [0xff, 0xff, 0xff, 0xff]);
        assert_eq!(arp_frame.target_mac(), MacAddr::new([10, 9, 8, 7, 6, 5]));
        assert_eq!(arp_frame.target_ip(), Ipv4Addr::BROADCAST);
    }

    #[test]
    fn decode_accepts_padding() {
        let request = ArpFrame::request(SENDER_MAC, SENDER_IP, TARGET_IP);
        let mut bytes = request.to_bytes();
        bytes.extend_from_slice(&[0; 4]);
        let decoded = ArpFrame::decode(&bytes).unwrap();
        assert_eq!(decoded.sender_ip(), SENDER_IP);
        assert_eq!(decoded.target_ip(), TARGET_IP);
    }

    #[test]
    fn random_addresses_survive_decode() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let sender_mac = MacAddr::new(rng.gen());
            let target_mac = MacAddr::new(rng.gen());
            let sender_ip = Ipv4Addr::from(rng.gen::<u32>());
            let target_ip = Ipv4Addr::from(rng.gen::<u32>());
            let op = if rng.gen() { ArpOp::Request } else { ArpOp::Reply };

            let frame = ArpFrame::new(op, sender_mac, sender_ip, target_mac, target_ip);
            let decoded = ArpFrame::decode(&frame.to_bytes()).unwrap();
            assert_eq!(decoded.op(), Some(op));
            assert_eq!(decoded.sender_mac(), sender_mac);
            assert_eq!(decoded.sender_ip(), sender_ip);
            assert_eq!(decoded.target_mac(), target_mac);
            assert_eq!(decoded.target_ip(), target_ip);
            assert_eq!(decoded.ethernet().dest_mac(), target_mac);
            assert_eq!(decoded.ethernet().src_mac(), sender_mac);
        }
    }

    #[test]
    fn decode_rejects_non_arp() {
        let request = ArpFrame::request(SENDER_MAC, SENDER_IP, TARGET_IP);
        let bytes = request.to_bytes();

        // truncated anywhere before the end of the ARP body
        for len in 0..ARP_FRAME_LEN {
            assert_eq!(ArpFrame::decode(&bytes[..len]), None, "length {}", len);
        }

        let mut ipv4 = bytes.clone();
        ipv4[12..14].copy_from_slice(&IPV4_ETHER_TYPE.to_be_bytes());
        assert_eq!(ArpFrame::decode(&ipv4), None);

        let mut bad_hlen = bytes.clone();
        bad_hlen[ETHERNET_HEADER_LEN + 4] = 8;
        assert_eq!(ArpFrame::decode(&bad_hlen), None);

        let mut ipv6_ptype = bytes;
        ipv6_ptype[ETHERNET_HEADER_LEN + 2..ETHERNET_HEADER_LEN + 4]
            .copy_from_slice(&0x86ddu16.to_be_bytes());
        assert_eq!(ArpFrame::decode(&ipv6_ptype), None);
    }

    #[test]
    fn unknown_opcode() {
        let mut bytes = ArpFrame::request(SENDER_MAC, SENDER_IP, TARGET_IP).to_bytes();
        bytes[ETHERNET_HEADER_LEN + 7] = 3;
        let frame = ArpFrame::decode(&bytes).unwrap();
        assert_eq!(frame.opcode(), 3);
        assert_eq!(frame.op(), None);
    }

    #[test]
    fn response_correlation() {
        let request = ArpFrame::request(SENDER_MAC, SENDER_IP, TARGET_IP);
        let responder = MacAddr::new([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);

        assert!(reply(responder, TARGET_IP, SENDER_IP).is_response_of(&request));
        // a different host answering
        assert!(!reply(responder, Ipv4Addr::new(10, 0, 0, 3), SENDER_IP).is_response_of(&request));
        // an answer to somebody else's question
        assert!(!reply(responder, TARGET_IP, Ipv4Addr::new(10, 0, 0, 9)).is_response_of(&request));
        // requests never answer anything, whatever their addresses
        let echoed = ArpFrame::new(ArpOp::Request, responder, TARGET_IP, SENDER_MAC, SENDER_IP);
        assert!(!echoed.is_response_of(&request));
        assert!(!request.is_response_of(&request));
    }
}
