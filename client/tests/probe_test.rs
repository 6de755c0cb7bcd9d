use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};

use client::client::{cancel_channel, resolve_v4, ProbeError, StunClient};
use client::config::ProbeConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stun_mapped::constants::*;
use stun_mapped::cursor::Cursor;
use stun_mapped::error::ParsePacketErr;
use stun_mapped::header::{Header, TransId};
use stun_mapped::message::binding_response;
use stun_mapped::util;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

enum Reply {
    Mapped,
    OtherTransId,
    Truncated,
    Silent,
}

// answers the first request, hands back the request header
async fn fake_server(reply: Reply) -> (SocketAddrV4, JoinHandle<Header>) {
    let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = match sock.local_addr().unwrap() {
        SocketAddr::V4(v) => v,
        SocketAddr::V6(_) => unreachable!(),
    };

    let handle = tokio::spawn(async move {
        let mut buf = vec![0u8; 1024];
        let (len, remote_addr) = sock.recv_from(&mut buf).await.unwrap();
        assert_eq!(len, HEADER_LEN);

        let header = Header::unpack(&mut Cursor::new(&buf[..len])).unwrap();
        let mapped = match remote_addr {
            SocketAddr::V4(v) => v,
            SocketAddr::V6(_) => unreachable!(),
        };

        let res = match reply {
            Reply::Mapped => binding_response(header.trans_id, mapped, &[]).to_vec(),
            Reply::OtherTransId => {
                let mut other: TransId = header.trans_id;
                other[TRANS_ID_LEN - 1] ^= 0xff;
                binding_response(other, mapped, &[]).to_vec()
            }
            Reply::Truncated => {
                let full = binding_response(header.trans_id, mapped, &[]);
                full[..full.len() - 3].to_vec()
            }
            Reply::Silent => vec![],
        };

        if !res.is_empty() {
            sock.send_to(&res, remote_addr).await.unwrap();
        }

        // keep the socket open until the client is done
        tokio::time::sleep(Duration::from_millis(300)).await;
        header
    });

    (addr, handle)
}

fn local_config(server: SocketAddrV4, timeout: Duration) -> ProbeConfig {
    ProbeConfig::new(&server.ip().to_string(), server.port(), timeout)
}

async fn local_socket() -> (UdpSocket, SocketAddrV4) {
    let sock = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = match sock.local_addr().unwrap() {
        SocketAddr::V4(v) => v,
        SocketAddr::V6(_) => unreachable!(),
    };
    (sock, addr)
}

#[test]
pub fn test_default_config() {
    let config = ProbeConfig::default();
    assert_eq!(config.host, STUN_HOST);
    assert_eq!(config.port, 3478);
    assert_eq!(config.timeout, Duration::from_millis(2000));
}

#[tokio::test]
async fn test_probe_mapped_address() {
    let (server, handle) = fake_server(Reply::Mapped).await;
    let (sock, local_addr) = local_socket().await;
    let (_cancel_tx, mut cancel_rx) = cancel_channel();

    let mut client = StunClient::new(local_config(server, Duration::from_secs(2)));
    let res = client.probe(&sock, &mut cancel_rx).await.unwrap();
    assert_eq!(res, Some(local_addr));

    let req = handle.await.unwrap();
    assert_eq!(req.msg_type, MESSAGE_TYPE_BIND_REQ);
    assert_eq!(req.msg_len, 0);
    assert_eq!(req.cookie, MAGIC_COOKIE);
}

#[tokio::test]
async fn test_probe_uses_injected_rng() {
    let (server, handle) = fake_server(Reply::Mapped).await;
    let (sock, _) = local_socket().await;
    let (_cancel_tx, mut cancel_rx) = cancel_channel();

    let rng = StdRng::seed_from_u64(42);
    let mut client = StunClient::with_rng(local_config(server, Duration::from_secs(2)), rng);
    assert!(client.probe(&sock, &mut cancel_rx).await.unwrap().is_some());

    let expected = util::new_trans_id_with(&mut StdRng::seed_from_u64(42));
    let req = handle.await.unwrap();
    assert_eq!(req.trans_id, expected);
}

#[tokio::test]
async fn test_probe_trans_id_mismatch() {
    let (server, _handle) = fake_server(Reply::OtherTransId).await;
    let (sock, _) = local_socket().await;
    let (_cancel_tx, mut cancel_rx) = cancel_channel();

    let mut client = StunClient::new(local_config(server, Duration::from_secs(2)));
    let res = client.probe(&sock, &mut cancel_rx).await;
    assert!(matches!(
        res,
        Err(ProbeError::Parse(ParsePacketErr::TransIdMismatch))
    ));
}

#[tokio::test]
async fn test_probe_truncated_response() {
    let (server, _handle) = fake_server(Reply::Truncated).await;
    let (sock, _) = local_socket().await;
    let (_cancel_tx, mut cancel_rx) = cancel_channel();

    let mut client = StunClient::new(local_config(server, Duration::from_secs(2)));
    let err = client.probe(&sock, &mut cancel_rx).await.unwrap_err();
    assert!(matches!(err, ProbeError::Parse(ParsePacketErr::BufSize(_))));
    assert!(format!("{}", err).starts_with("STUN resolve failure"));
}

#[tokio::test]
async fn test_probe_timeout() {
    let (server, _handle) = fake_server(Reply::Silent).await;
    let (sock, _) = local_socket().await;
    let (_cancel_tx, mut cancel_rx) = cancel_channel();

    let mut client = StunClient::new(local_config(server, Duration::from_millis(100)));
    let err = client.probe(&sock, &mut cancel_rx).await.unwrap_err();
    assert!(matches!(err, ProbeError::Timeout));
    assert_eq!(format!("{}", err), "STUN timeout");
}

#[tokio::test]
async fn test_probe_cancelled_before_response() {
    let (server, handle) = fake_server(Reply::Mapped).await;
    let (sock, _) = local_socket().await;
    let (cancel_tx, mut cancel_rx) = cancel_channel();
    cancel_tx.send(true).unwrap();

    let mut client = StunClient::new(local_config(server, Duration::from_secs(2)));
    let res = client.probe(&sock, &mut cancel_rx).await.unwrap();
    assert_eq!(res, None);

    // the request still went out
    let req = handle.await.unwrap();
    assert_eq!(req.msg_type, MESSAGE_TYPE_BIND_REQ);
}

#[tokio::test]
async fn test_probe_cancelled_during_wait() {
    let (server, _handle) = fake_server(Reply::Silent).await;
    let (sock, _) = local_socket().await;
    let (cancel_tx, mut cancel_rx) = cancel_channel();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_tx.send(true).unwrap();
    });

    let start = Instant::now();
    let mut client = StunClient::new(local_config(server, Duration::from_secs(5)));
    let res = client.probe(&sock, &mut cancel_rx).await.unwrap();
    assert_eq!(res, None);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_probe_dropped_cancel_sender() {
    let (server, _handle) = fake_server(Reply::Mapped).await;
    let (sock, local_addr) = local_socket().await;
    let (cancel_tx, mut cancel_rx) = cancel_channel();
    drop(cancel_tx);

    let mut client = StunClient::new(local_config(server, Duration::from_secs(2)));
    let res = client.probe(&sock, &mut cancel_rx).await.unwrap();
    assert_eq!(res, Some(local_addr));
}

#[tokio::test]
async fn test_probe_resolve_failure() {
    let (sock, _) = local_socket().await;
    let (_cancel_tx, mut cancel_rx) = cancel_channel();

    let config = ProbeConfig::new("stun.invalid", STUN_PORT, Duration::from_millis(100));
    let mut client = StunClient::new(config);
    let res = client.probe(&sock, &mut cancel_rx).await;
    assert!(matches!(res, Err(ProbeError::Resolve { .. })));
}

#[tokio::test]
async fn test_resolve_v4() {
    let addr = resolve_v4("127.0.0.1", STUN_PORT).await.unwrap();
    assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::LOCALHOST, STUN_PORT));

    // ipv6 only
    let res = resolve_v4("::1", STUN_PORT).await;
    assert!(matches!(res, Err(ProbeError::Resolve { .. })));
}
