use crate::*;
use std::borrow::Cow;

#[derive(Clone, Debug)]
pub struct EthernetFrame {
    pub data: PacketData,
    pub payload_offset: usize,
}

impl EthernetFrame {
    pub fn from_buffer(frame: PacketData) -> Result<EthernetFrame, &'static str> {
        // Ethernet II frames must be at least the header, which is 14bytes
        // 0                    6                    12                      14
        // |---6 byte Dest_MAC--|---6 byte Src_MAC---|--2 Byte EtherType---|
        // 802.1Q tags never reach us here, the kernel strips them off AF_PACKET sockets.

        if frame.len() < ETHERNET_HEADER_LEN {
            return Err("Frame is less than the minimum of 14 bytes");
        }

        Ok(EthernetFrame {
            data: frame,
            payload_offset: ETHERNET_HEADER_LEN,
        })
    }

    /// Returns an EthernetFrame with a zeroed header and no payload.
    pub fn empty() -> EthernetFrame {
        EthernetFrame {
            data: vec![0; ETHERNET_HEADER_LEN],
            payload_offset: ETHERNET_HEADER_LEN,
        }
    }

    pub fn dest_mac(&self) -> MacAddr {
        let mut bytes = [0; MAC_ADDR_LEN];
        bytes.copy_from_slice(&self.data[0..6]);
        MacAddr::new(bytes)
    }

    pub fn src_mac(&self) -> MacAddr {
        let mut bytes = [0; MAC_ADDR_LEN];
        bytes.copy_from_slice(&self.data[6..12]);
        MacAddr::new(bytes)
    }

    pub fn set_dest_mac(&mut self, mac: MacAddr) {
        self.data[..6].copy_from_slice(&mac.bytes);
    }

    pub fn set_src_mac(&mut self, mac: MacAddr) {
        self.data[6..12].copy_from_slice(&mac.bytes);
    }

    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes([self.data[12], self.data[13]])
    }

    pub fn set_ether_type(&mut self, ether_type: u16) {
        self.data[12..=13].copy_from_slice(&ether_type.to_be_bytes());
    }

    // Everything after the header, including any link layer padding.
    pub fn payload(&self) -> Cow<[u8]> {
        Cow::from(&self.data[self.payload_offset..])
    }

    pub fn set_payload(&mut self, payload: &[u8]) {
        self.data.truncate(self.payload_offset);
        self.data.reserve_exact(payload.len());
        self.data.extend(payload);
    }

    /// Copies the frame out, zero padded up to `ETHERNET_MIN_FRAME_LEN`.
    pub fn to_padded_bytes(&self) -> PacketData {
        let mut bytes = self.data.clone();
        if bytes.len() < ETHERNET_MIN_FRAME_LEN {
            bytes.resize(ETHERNET_MIN_FRAME_LEN, 0);
        }
        bytes
    }
}

/// EthernetFrames are considered the same if they carry the same bytes.
impl PartialEq for EthernetFrame {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for EthernetFrame {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[test]
    fn ethernet_frame() {
        let data: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 0, 0];
        let frame = EthernetFrame::from_buffer(data).unwrap();
        assert_eq!(
            frame.dest_mac(),
            MacAddr::new([0xde, 0xad, 0xbe, 0xef, 0xff, 0xff])
        );
        assert_eq!(frame.src_mac(), MacAddr::new([1, 2, 3, 4, 5, 6]));
        assert_eq!(frame.ether_type(), 0);
        assert_eq!(frame.payload().len(), 0);
    }

    #[test]
    fn set_payload() {
        let mut frame = EthernetFrame::empty();
        frame.set_payload(&[9, 9, 9]);

        let new_payload: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        frame.set_payload(&new_payload);
        assert_eq!(frame.payload(), new_payload);
        assert_eq!(frame.data.len(), ETHERNET_HEADER_LEN + new_payload.len());
    }

    #[test]
    fn invalid_data_length() {
        let data: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0xff, 0xff, 1, 2, 3, 4, 5, 6];
        assert_eq!(
            EthernetFrame::from_buffer(data),
            Err("Frame is less than the minimum of 14 bytes")
        );
    }

    #[test]
    fn set_macs() {
        let mut frame = EthernetFrame::empty();
        let new_dest = MacAddr::new([0x98, 0x88, 0x18, 0x12, 0xb4, 0xdf]);
        let new_src = MacAddr::new([0x00, 0x1b, 0x21, 0x3a, 0x4c, 0x5d]);
        frame.set_dest_mac(new_dest);
        frame.set_src_mac(new_src);
        assert_eq!(frame.dest_mac(), new_dest);
        assert_eq!(frame.src_mac(), new_src);
    }

    #[test]
    fn ether_type() {
        let mut frame = EthernetFrame::empty();
        frame.set_ether_type(ARP_ETHER_TYPE);
        assert_eq!(&frame.data[12..14], &[0x08, 0x06]);
        assert_eq!(frame.ether_type(), ARP_ETHER_TYPE);
    }

    #[test]
    fn padding() {
        let mut frame = EthernetFrame::empty();
        frame.set_payload(&[0xab; 28]);
        let bytes = frame.to_padded_bytes();
        assert_eq!(bytes.len(), ETHERNET_MIN_FRAME_LEN);
        assert_eq!(&bytes[..42], &frame.data[..]);
        assert!(bytes[42..].iter().all(|b| *b == 0));

        frame.set_payload(&[0xab; 100]);
        assert_eq!(frame.to_padded_bytes().len(), 114);
    }
}
