use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePacketErr {
    #[error("buf size: {0}")]
    BufSize(String),

    #[error("not a binding success response, message type: {0:#06x}")]
    MessageType(u16),

    #[error("transaction id mismatch")]
    TransIdMismatch,

    #[error("xor-mapped-address not found")]
    NoMappedAddress,
}
