#![allow(clippy::len_without_is_empty)]

use crate::constants::*;
use crate::cursor::Cursor;
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::ParsePacketErr;

pub type TransId = [u8; TRANS_ID_LEN];

// rfc 5389, 6
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub msg_type: u16,

    // attributes only, the 20 header bytes are not counted
    pub msg_len: u16,

    pub cookie: [u8; 4],

    pub trans_id: TransId,
}

impl Header {
    pub fn new(msg_type: u16, msg_len: u16, trans_id: TransId) -> Self {
        Self {
            msg_type,
            msg_len,
            cookie: MAGIC_COOKIE,
            trans_id,
        }
    }

    pub fn len(&self) -> usize {
        HEADER_LEN
    }

    pub fn pack(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_LEN);
        buf.put_u16(self.msg_type);
        buf.put_u16(self.msg_len);
        buf.put_slice(&self.cookie);
        buf.put_slice(&self.trans_id);
        buf.freeze()
    }

    // length only, message type and transaction id are checked by the caller
    pub fn unpack(cursor: &mut Cursor) -> Result<Self, ParsePacketErr> {
        if cursor.remaining() < HEADER_LEN {
            return Err(ParsePacketErr::BufSize(format!(
                "header buf len:{} < {}",
                cursor.remaining(),
                HEADER_LEN
            )));
        }

        let msg_type = cursor.read_u16()?;
        let msg_len = cursor.read_u16()?;
        let cookie = cursor.read_array::<4>()?;
        let trans_id = cursor.read_array::<TRANS_ID_LEN>()?;

        Ok(Self {
            msg_type,
            msg_len,
            cookie,
            trans_id,
        })
    }
}
