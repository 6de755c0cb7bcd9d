use std::time::Duration;
use stun_mapped::constants::{STUN_HOST, STUN_PORT, STUN_TIMEOUT_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub host: String,
    pub port: u16,

    // how long to wait for the response after the request is sent
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new(STUN_HOST, STUN_PORT, Duration::from_millis(STUN_TIMEOUT_MS))
    }
}
