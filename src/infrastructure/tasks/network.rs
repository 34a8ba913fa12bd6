//! Wi-Fi link (re)connection
//!
//! The reconnector is a small state machine advanced one transition per
//! [`NetworkReconnector::step`]. [`NetworkReconnector::reconnect`] drives it
//! until the link is up; there is no timeout, the node has nothing better to
//! do while offline.

use core::fmt;
use core::net::Ipv4Addr;
use core::time::Duration;

use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::{ConfigError, NetworkCandidate, NetworkConfig};
use crate::domain::ports::{LinkStatus, ScanEntry, WifiTransport};

/// Signal strength assumed for a candidate missing from the scan
pub const UNSEEN_RSSI: i16 = -999;

/// Network being joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinTarget {
    /// Credentials stored by the radio from an earlier join
    Stored,
    Candidate(NetworkCandidate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Scanning,
    Connecting(JoinTarget),
    Connected,
}

#[derive(Debug)]
pub enum NetworkError<E> {
    /// Scan request failed
    Scan(E),
    /// Join request was rejected by the radio
    Join(E),
}

impl<E: fmt::Debug> fmt::Display for NetworkError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::Scan(e) => write!(f, "scan failed: {:?}", e),
            NetworkError::Join(e) => write!(f, "join failed: {:?}", e),
        }
    }
}

/// Strongest reading of `candidate` in `scan`, or [`UNSEEN_RSSI`]
pub fn candidate_strength(candidate: &NetworkCandidate, scan: &[ScanEntry]) -> i16 {
    scan.iter()
        .filter(|entry| entry.ssid.as_str() == candidate.ssid)
        .map(|entry| entry.rssi)
        .max()
        .unwrap_or(UNSEEN_RSSI)
}

/// Pick the candidate with the strongest signal.
///
/// Candidates are compared in declaration order with a strict `>`, so on an
/// exact tie the earlier one wins. Returns `None` only for an empty list.
pub fn select_candidate<'a>(
    candidates: &'a [NetworkCandidate],
    scan: &[ScanEntry],
) -> Option<(&'a NetworkCandidate, i16)> {
    let mut best: Option<(&'a NetworkCandidate, i16)> = None;
    for candidate in candidates {
        let rssi = candidate_strength(candidate, scan);
        match best {
            Some((_, best_rssi)) if rssi <= best_rssi => {}
            _ => best = Some((candidate, rssi)),
        }
    }
    best
}

pub struct NetworkReconnector {
    candidates: &'static [NetworkCandidate],
    poll_interval: Duration,
    state: LinkState,
}

impl NetworkReconnector {
    pub fn new(config: &NetworkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            candidates: config.candidates,
            poll_interval: config.link_poll_interval,
            state: LinkState::Idle,
        })
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Forget the current link; the next step starts over from [`LinkState::Idle`]
    pub fn mark_lost(&mut self) {
        if self.state == LinkState::Connected {
            info!("network: link marked as lost");
        }
        self.state = LinkState::Idle;
    }

    /// Advance the state machine by one transition.
    ///
    /// On error the machine falls back to a state from which the sequence is
    /// retried: a failed scan stays in `Scanning`, a rejected join goes back
    /// to `Idle`.
    pub async fn step<T: WifiTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<LinkState, NetworkError<T::Error>> {
        match self.state {
            LinkState::Idle => {
                if transport.has_stored_credentials() {
                    info!("network: connecting with stored credentials");
                    transport
                        .connect_stored()
                        .await
                        .map_err(NetworkError::Join)?;
                    self.state = LinkState::Connecting(JoinTarget::Stored);
                } else {
                    self.state = LinkState::Scanning;
                }
            }
            LinkState::Scanning => {
                info!("network: scanning for networks");
                let results = transport.scan().await.map_err(NetworkError::Scan)?;
                debug!("network: scan found {} access points", results.len());

                if let Some((candidate, rssi)) = select_candidate(self.candidates, &results) {
                    info!("network: connecting to {} (rssi {})", candidate.ssid, rssi);
                    let candidate = *candidate;
                    if let Err(e) = transport.connect(candidate.ssid, candidate.password).await {
                        self.state = LinkState::Idle;
                        return Err(NetworkError::Join(e));
                    }
                    self.state = LinkState::Connecting(JoinTarget::Candidate(candidate));
                }
            }
            LinkState::Connecting(_) => {
                if transport.link_status() == LinkStatus::Up {
                    match transport.local_address() {
                        Some(address) => info!("network: connected, IP address: {}", address),
                        None => info!("network: connected"),
                    }
                    self.state = LinkState::Connected;
                } else {
                    debug!("network: waiting for link");
                }
            }
            LinkState::Connected => {}
        }

        Ok(self.state)
    }

    /// Drive the state machine until the link is up.
    ///
    /// Waits `link_poll_interval` between link checks and after every failed
    /// step. Returns the assigned address.
    pub async fn run_until_connected<T: WifiTransport, D: DelayNs>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
    ) -> Option<Ipv4Addr> {
        loop {
            match self.step(transport).await {
                Ok(LinkState::Connected) => return transport.local_address(),
                Ok(LinkState::Connecting(_)) => delay.delay_ms(self.poll_interval_ms()).await,
                Ok(LinkState::Idle | LinkState::Scanning) => {}
                Err(e) => {
                    warn!("network: {}", e);
                    delay.delay_ms(self.poll_interval_ms()).await;
                }
            }
        }
    }

    /// Run the full reconnect sequence from [`LinkState::Idle`]
    pub async fn reconnect<T: WifiTransport, D: DelayNs>(
        &mut self,
        transport: &mut T,
        delay: &mut D,
    ) -> Option<Ipv4Addr> {
        self.mark_lost();
        self.run_until_connected(transport, delay).await
    }

    fn poll_interval_ms(&self) -> u32 {
        u32::try_from(self.poll_interval.as_millis()).unwrap_or(u32::MAX)
    }
}
