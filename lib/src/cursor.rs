use crate::error::ParsePacketErr;

/// Read-only view over a received datagram.
///
/// Every read checks the remaining length before touching the buffer and
/// leaves the offset unchanged when it fails.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], ParsePacketErr> {
        if self.remaining() < n {
            return Err(ParsePacketErr::BufSize(format!(
                "need {} bytes at offset {}, remaining {}",
                n,
                self.offset,
                self.remaining()
            )));
        }

        let start = self.offset;
        self.offset += n;
        Ok(&self.buf[start..self.offset])
    }

    pub fn skip(&mut self, n: usize) -> Result<(), ParsePacketErr> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, ParsePacketErr> {
        let buf = self.read_bytes(1)?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ParsePacketErr> {
        let buf = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([buf[0], buf[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ParsePacketErr> {
        let buf = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ParsePacketErr> {
        let mut arr = [0_u8; N];
        arr.copy_from_slice(self.read_bytes(N)?);
        Ok(arr)
    }
}
