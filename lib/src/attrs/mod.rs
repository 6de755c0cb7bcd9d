#![allow(clippy::len_without_is_empty)]

use crate::constants::ATTR_HEADER_LEN;
use crate::cursor::Cursor;
use crate::error::ParsePacketErr;
use bytes::{BufMut, Bytes, BytesMut};

pub mod xor_address;

// rfc 5389, 15
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrHeader {
    pub attr_type: u16,

    // value only, header not included
    pub attr_len: u16,
}

impl AttrHeader {
    pub fn new(attr_type: u16, attr_len: u16) -> Self {
        Self {
            attr_type,
            attr_len,
        }
    }

    pub fn unpack(cursor: &mut Cursor) -> Result<Self, ParsePacketErr> {
        if cursor.remaining() < ATTR_HEADER_LEN {
            return Err(ParsePacketErr::BufSize(format!(
                "attr header buf len:{} < {}",
                cursor.remaining(),
                ATTR_HEADER_LEN
            )));
        }

        let attr_type = cursor.read_u16()?;
        let attr_len = cursor.read_u16()?;
        Ok(Self {
            attr_type,
            attr_len,
        })
    }

    pub fn put(&self, buf: &mut BytesMut) {
        buf.put_u16(self.attr_type);
        buf.put_u16(self.attr_len);
    }
}

/// An attribute carried as opaque bytes, value length taken from the data.
#[derive(Debug, Clone)]
pub struct RawAttr {
    pub attr_type: u16,
    pub value: Bytes,
}

impl RawAttr {
    pub fn new(attr_type: u16, value: Bytes) -> Self {
        Self { attr_type, value }
    }

    pub fn len(&self) -> usize {
        self.value.len() + ATTR_HEADER_LEN
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        AttrHeader::new(self.attr_type, self.value.len() as u16).put(&mut buf);
        buf.put_slice(&self.value);
        buf.freeze()
    }
}
