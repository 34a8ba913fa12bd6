use core::fmt;
use core::net::Ipv4Addr;

use heapless::{String, Vec};

/// Maximum length of an SSID
pub const MAX_SSID_LEN: usize = 32;

/// Maximum number of access points kept from one scan
pub const MAX_SCAN_RESULTS: usize = 16;

pub type Ssid = String<MAX_SSID_LEN>;

pub type ScanResults = Vec<ScanEntry, MAX_SCAN_RESULTS>;

/// One access point seen during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub ssid: Ssid,
    /// Signal strength in dBm
    pub rssi: i16,
}

impl ScanEntry {
    /// Build an entry, truncating SSIDs longer than [`MAX_SSID_LEN`]
    pub fn new(ssid: &str, rssi: i16) -> Self {
        let mut name = Ssid::new();
        for ch in ssid.chars() {
            if name.push(ch).is_err() {
                break;
            }
        }
        Self { ssid: name, rssi }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// Associated with an access point and holding an address
    Up,
    Down,
}

/// Wireless station interface.
#[allow(async_fn_in_trait)]
pub trait WifiTransport {
    type Error: fmt::Debug;

    /// Scan for visible access points
    async fn scan(&mut self) -> Result<ScanResults, Self::Error>;

    /// Whether the radio still holds credentials from a previous join
    fn has_stored_credentials(&self) -> bool;

    /// Rejoin using the stored credentials
    async fn connect_stored(&mut self) -> Result<(), Self::Error>;

    /// Start joining `ssid`. Completion is observed through [`Self::link_status`].
    async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error>;

    fn link_status(&self) -> LinkStatus;

    /// Address assigned to the station, if any
    fn local_address(&self) -> Option<Ipv4Addr>;

    /// Drop stored credentials so the next join scans again
    fn forget_stored_credentials(&mut self);
}
