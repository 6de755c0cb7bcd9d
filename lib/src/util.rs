use crate::constants::{MAGIC_COOKIE, TRANS_ID_LEN};
use crate::header::TransId;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt::Write as _;
use std::net::{Ipv4Addr, SocketAddrV4};

pub fn print_bytes(buf: &[u8], separator: &str, row_width: usize) -> String {
    let mut hex = String::new();
    buf.iter().enumerate().for_each(|(x, y)| {
        let _ = write!(hex, "{:02X}", y);
        if (x + 1) % row_width == 0 {
            hex.push('\n');
        } else {
            hex.push_str(separator);
        }
    });

    hex
}

/// Seeds a generator for transaction ids once, from OS entropy.
pub fn new_trans_id_rng() -> StdRng {
    StdRng::from_entropy()
}

pub fn new_trans_id() -> TransId {
    new_trans_id_with(&mut rand::thread_rng())
}

// three 32-bit words, each drawn independently
pub fn new_trans_id_with<R: RngCore + ?Sized>(rng: &mut R) -> TransId {
    let mut trans_id = [0u8; TRANS_ID_LEN];
    for word in trans_id.chunks_exact_mut(4) {
        word.copy_from_slice(&rng.next_u32().to_be_bytes());
    }
    trans_id
}

// applying it twice gives back the original address
pub fn xor_address_v4(addr: SocketAddrV4) -> SocketAddrV4 {
    let port = addr.port();
    let magic_prefix = u16::from_be_bytes([MAGIC_COOKIE[0], MAGIC_COOKIE[1]]);
    let port = port ^ magic_prefix;

    let ip = u32::from(*addr.ip()) ^ u32::from_be_bytes(MAGIC_COOKIE);

    SocketAddrV4::new(Ipv4Addr::from(ip), port)
}
