// 0x2112A442
pub const MAGIC_COOKIE: [u8; 4] = [0x21, 0x12, 0xA4, 0x42];

pub const TRANS_ID_LEN: usize = 12;
pub const HEADER_LEN: usize = 20;
pub const ATTR_HEADER_LEN: usize = 4;

// reserved(1) + family(1) + port(2) + ipv4(4)
pub const XOR_ADDRESS_V4_LEN: usize = 8;

pub const MESSAGE_TYPE_BIND_REQ: u16 = 0x0001;
pub const MESSAGE_TYPE_BIND_RES: u16 = 0x0101;

pub const ATTR_FAMILY_IPV4: u8 = 0x01;

pub const ATTR_XOR_MAPPED_ADDRESS: u16 = 0x0020;

pub const STUN_HOST: &str = "ishoal.ink";
pub const STUN_PORT: u16 = 3478;
pub const STUN_TIMEOUT_MS: u64 = 2000;

pub const RECV_BUF_LEN: usize = 512;
