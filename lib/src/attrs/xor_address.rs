use crate::attrs::RawAttr;
use crate::constants::*;
use crate::cursor::Cursor;
use crate::error::ParsePacketErr;
use crate::util;
use bytes::{BufMut, BytesMut};
use std::net::{Ipv4Addr, SocketAddrV4};

// xor-mapped-address, ipv4 only
// port    xor high 16 bits of magic cookie
// address xor magic cookie

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorMappedAddress {
    pub address: SocketAddrV4,
}

impl XorMappedAddress {
    pub fn new(address: SocketAddrV4) -> Self {
        Self { address }
    }

    /// Decodes the 8 byte value that follows the attribute header.
    ///
    /// The family byte is not inspected, the value is always read as IPv4.
    pub fn unpack(cursor: &mut Cursor) -> Result<Self, ParsePacketErr> {
        if cursor.remaining() < XOR_ADDRESS_V4_LEN {
            return Err(ParsePacketErr::BufSize(format!(
                "xor-mapped-address buf len:{} < {}",
                cursor.remaining(),
                XOR_ADDRESS_V4_LEN
            )));
        }

        let _reserved = cursor.read_u8()?;
        let _family = cursor.read_u8()?;
        let port = cursor.read_u16()?;
        let ip = cursor.read_array::<4>()?;

        let xored = SocketAddrV4::new(Ipv4Addr::from(ip), port);
        Ok(Self {
            address: util::xor_address_v4(xored),
        })
    }

    /// Encodes the whole attribute, header included.
    pub fn pack(&self) -> RawAttr {
        let xored = util::xor_address_v4(self.address);

        let mut bytes_buf = BytesMut::with_capacity(XOR_ADDRESS_V4_LEN);
        bytes_buf.put_u8(0);
        bytes_buf.put_u8(ATTR_FAMILY_IPV4);
        bytes_buf.put_u16(xored.port());
        bytes_buf.put_slice(&xored.ip().octets());

        RawAttr::new(ATTR_XOR_MAPPED_ADDRESS, bytes_buf.freeze())
    }
}

impl From<XorMappedAddress> for RawAttr {
    fn from(attr: XorMappedAddress) -> Self {
        attr.pack()
    }
}
