use std::net::{IpAddr, Ipv4Addr};
use std::process;
use std::time::Duration;

use clap::builder::ValueParser;
use clap::{Arg, Command};
use client::client::{cancel_channel, StunClient};
use client::config::ProbeConfig;
use client::signal::cancel_on_shutdown;
use log::{debug, error, info};
use stun_mapped::constants::{STUN_HOST, STUN_PORT, STUN_TIMEOUT_MS};
use tokio::net::UdpSocket;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

fn parse_ip(s: &str) -> Result<Ipv4Addr, String> {
    let ip = match s.parse::<IpAddr>() {
        Ok(v) => v,
        Err(e) => {
            return Err(format!("{}", e));
        }
    };

    match ip {
        IpAddr::V4(ip) => {
            if ip.is_unspecified() {
                return Err("0.0.0.0 not allow".to_string());
            }
            Ok(ip)
        }
        IpAddr::V6(_) => Err("ipv6 not support".to_string()),
    }
}

// prints the error and ends the process
fn fatal(msg: String) -> ! {
    error!("{}", msg);
    eprintln!("{}", msg);
    process::exit(1);
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let app = Command::new(APP_NAME)
        .version(APP_VERSION)
        .about("discover the public ipv4 address and port with a stun binding request")
        .arg(
            Arg::new("host")
                .long("host")
                .takes_value(true)
                .default_value(STUN_HOST)
                .help("stun server hostname"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .takes_value(true)
                .help("stun server port")
                .value_parser(clap::value_parser!(u16).range(1..65536)),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .takes_value(true)
                .help("response timeout in milliseconds")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("local_ip")
                .long("local_ip")
                .takes_value(true)
                .help("local ip, all interfaces when omitted")
                .value_parser(ValueParser::new(parse_ip)),
        )
        .get_matches();

    let host: &String = app.get_one("host").expect("wrong host");
    let port: u16 = app.get_one::<u16>("port").copied().unwrap_or(STUN_PORT);
    let timeout: u64 = app
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(STUN_TIMEOUT_MS);
    let local_ip: Ipv4Addr = app
        .get_one::<Ipv4Addr>("local_ip")
        .copied()
        .unwrap_or(Ipv4Addr::UNSPECIFIED);

    let config = ProbeConfig::new(host, port, Duration::from_millis(timeout));
    debug!("config: {:?}", config);

    let sock = match UdpSocket::bind((local_ip, 0)).await {
        Ok(v) => v,
        Err(e) => fatal(format!("can't bind {}, {}", local_ip, e)),
    };
    debug!("local addr: {:?}", sock.local_addr());

    let (cancel_tx, mut cancel_rx) = cancel_channel();
    let _signal_handle = tokio::spawn(cancel_on_shutdown(cancel_tx));

    let mut client = StunClient::new(config);
    match client.probe(&sock, &mut cancel_rx).await {
        Ok(Some(addr)) => {
            info!("public address: {}", addr);
            println!("{}", addr);
        }
        Ok(None) => {
            info!("stun probe abandoned");
        }
        Err(e) => fatal(format!("{}", e)),
    }
}
