use bytes::Bytes;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::RngCore;
use std::io;
use std::net::{SocketAddr, SocketAddrV4};
use stun_mapped::constants::RECV_BUF_LEN;
use stun_mapped::error::ParsePacketErr;
use stun_mapped::message::{binding_request, parse_binding_response};
use stun_mapped::util::{new_trans_id_rng, new_trans_id_with, print_bytes};
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::sync::watch;

use crate::config::ProbeConfig;

/// `true` asks a running probe to stop.
pub type CancelRx = watch::Receiver<bool>;
pub type CancelTx = watch::Sender<bool>;

pub fn cancel_channel() -> (CancelTx, CancelRx) {
    watch::channel(false)
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("can't resolve {host}: {reason}")]
    Resolve { host: String, reason: String },

    #[error("can't send to {addr}: {source}")]
    Send { addr: SocketAddrV4, source: io::Error },

    #[error("STUN timeout")]
    Timeout,

    #[error("can't read response: {0}")]
    Read(#[source] io::Error),

    #[error("STUN resolve failure: {0}")]
    Parse(#[from] ParsePacketErr),
}

//---------------------------------------

/// One Binding exchange per `probe` call over a socket owned by the caller.
///
/// The random source for transaction ids is seeded once, when the client is
/// built, and reused by every probe.
pub struct StunClient<R = StdRng> {
    config: ProbeConfig,
    rng: R,
}

impl StunClient<StdRng> {
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_rng(config, new_trans_id_rng())
    }
}

impl<R: RngCore> StunClient<R> {
    pub fn with_rng(config: ProbeConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Sends a Binding Request and waits for the answer.
    ///
    /// Returns `Ok(None)` when `cancel` fires before the response arrives, no
    /// matter whether a datagram is already waiting on the socket. Once a
    /// datagram has been read it is parsed without looking at `cancel` again.
    pub async fn probe(
        &mut self,
        sock: &UdpSocket,
        cancel: &mut CancelRx,
    ) -> Result<Option<SocketAddrV4>, ProbeError> {
        let server = resolve_v4(&self.config.host, self.config.port).await?;

        let trans_id = new_trans_id_with(&mut self.rng);
        let req = binding_request(trans_id);
        debug!(
            "{:?} --> {}\n{}",
            sock.local_addr(),
            server,
            print_bytes(&req, " ", 8)
        );

        let sent = sock
            .send_to(&req, server)
            .await
            .map_err(|e| ProbeError::Send {
                addr: server,
                source: e,
            })?;
        debug!("sent: {}", sent);

        let mut recv_buf = [0u8; RECV_BUF_LEN];
        let (len, remote_addr) = tokio::select! {
            biased;

            _ = cancelled(cancel) => {
                info!("stun probe to {} cancelled", server);
                return Ok(None);
            }
            res = sock.recv_from(&mut recv_buf) => res.map_err(ProbeError::Read)?,
            _ = tokio::time::sleep(self.config.timeout) => {
                return Err(ProbeError::Timeout);
            }
        };

        let buf = Bytes::copy_from_slice(&recv_buf[..len]);
        debug!("recv len: {}", buf.len());
        debug!(
            "{:?} <-- {}\n{}",
            sock.local_addr(),
            remote_addr,
            print_bytes(&buf, " ", 8)
        );

        let address = parse_binding_response(&buf, &trans_id)?;
        debug!("xor_mapped_address: {}", address);

        Ok(Some(address))
    }
}

pub async fn probe_public_addr(
    sock: &UdpSocket,
    cancel: &mut CancelRx,
) -> Result<Option<SocketAddrV4>, ProbeError> {
    StunClient::new(ProbeConfig::default())
        .probe(sock, cancel)
        .await
}

pub async fn resolve_v4(host: &str, port: u16) -> Result<SocketAddrV4, ProbeError> {
    let addrs = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| ProbeError::Resolve {
            host: host.to_string(),
            reason: format!("{}", e),
        })?;

    for addr in addrs {
        if let SocketAddr::V4(v) = addr {
            return Ok(v);
        }
    }

    Err(ProbeError::Resolve {
        host: host.to_string(),
        reason: "no ipv4 address".to_string(),
    })
}

// resolves once `true` is observed, never if the sender is gone
async fn cancelled(cancel: &mut CancelRx) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }

        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
