use crate::attrs::xor_address::XorMappedAddress;
use crate::attrs::{AttrHeader, RawAttr};
use crate::constants::*;
use crate::cursor::Cursor;
use crate::error::ParsePacketErr;
use crate::header::{Header, TransId};
use bytes::{BufMut, Bytes, BytesMut};
use log::debug;
use std::net::SocketAddrV4;

/// Builds a Binding Request: 20 byte header, no attributes.
pub fn binding_request(trans_id: TransId) -> Bytes {
    Header::new(MESSAGE_TYPE_BIND_REQ, 0, trans_id).pack()
}

/// Builds a Binding Success Response whose XOR-MAPPED-ADDRESS follows `extra_attrs`.
pub fn binding_response(trans_id: TransId, address: SocketAddrV4, extra_attrs: &[RawAttr]) -> Bytes {
    let xor_attr: RawAttr = XorMappedAddress::new(address).into();

    let attrs_len = extra_attrs.iter().fold(xor_attr.len(), |acc, x| acc + x.len());
    let header = Header::new(MESSAGE_TYPE_BIND_RES, attrs_len as u16, trans_id);

    let mut buf = BytesMut::with_capacity(HEADER_LEN + attrs_len);
    buf.put_slice(&header.pack());
    for v in extra_attrs.iter() {
        buf.put_slice(&v.pack());
    }
    buf.put_slice(&xor_attr.pack());

    buf.freeze()
}

/// Extracts the public address from a Binding Success Response.
///
/// The response must echo `trans_id`. Attributes are walked in order and the
/// first XOR-MAPPED-ADDRESS wins. Length fields inside the message are never
/// trusted: a declared length running past the end of `buf` is an error.
pub fn parse_binding_response(buf: &[u8], trans_id: &TransId) -> Result<SocketAddrV4, ParsePacketErr> {
    let mut cursor = Cursor::new(buf);

    let header = Header::unpack(&mut cursor)?;
    if header.msg_type != MESSAGE_TYPE_BIND_RES {
        return Err(ParsePacketErr::MessageType(header.msg_type));
    }

    if header.trans_id != *trans_id {
        return Err(ParsePacketErr::TransIdMismatch);
    }

    while !cursor.is_empty() {
        let attr = AttrHeader::unpack(&mut cursor)?;

        if attr.attr_type == ATTR_XOR_MAPPED_ADDRESS {
            let xor = XorMappedAddress::unpack(&mut cursor)?;
            return Ok(xor.address);
        }

        debug!(
            "skip attr, type: {:#06x}, len: {}",
            attr.attr_type, attr.attr_len
        );
        cursor.skip(attr.attr_len as usize)?;
    }

    Err(ParsePacketErr::NoMappedAddress)
}
