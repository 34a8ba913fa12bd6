//! In-memory fakes shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::Ipv4Addr;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;

use hobby_house::config::{BrokerConfig, NetworkCandidate, NetworkConfig, NodeConfig, Topics};
use hobby_house::domain::entity::Channel;
use hobby_house::domain::ports::{
    LightOutput, LinkStatus, MessageHandler, MessagingClient, ScanEntry, ScanResults,
    SecurityRelay, WifiTransport,
};

// -----------------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------------

pub const WARIO: NetworkCandidate = NetworkCandidate::new("Wario", "mansion1");
pub const HOBBY_HOUSE: NetworkCandidate = NetworkCandidate::new("HobbyHouse", "mansion1");
pub const CANDIDATES: [NetworkCandidate; 2] = [WARIO, HOBBY_HOUSE];

pub const SECURITY_TOPIC: &str = "hobby/security";
pub const LIGHTS_TOPIC: &str = "hobby/lights";
pub const CLIENT_ID: &str = "hobby-house";

pub fn node_config() -> NodeConfig {
    NodeConfig {
        network: NetworkConfig {
            candidates: &CANDIDATES,
            link_poll_interval: std::time::Duration::from_millis(500),
            forget_credentials_on_boot: true,
        },
        broker: BrokerConfig {
            host: "192.168.1.5",
            port: 1883,
            client_id: CLIENT_ID,
        },
        topics: Topics::default(),
    }
}

// -----------------------------------------------------------------------------
// Outputs
// -----------------------------------------------------------------------------

/// Light output remembering the last level of every channel
#[derive(Debug, Default)]
pub struct RecordingLight {
    pub levels: [u8; 3],
    pub writes: usize,
}

impl RecordingLight {
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.levels[0], self.levels[1], self.levels[2])
    }
}

impl LightOutput for RecordingLight {
    fn set_channel(&mut self, channel: Channel, level: u8) {
        let index = match channel {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        };
        self.levels[index] = level;
        self.writes += 1;
    }
}

/// Relay remembering every commanded state
#[derive(Debug, Default)]
pub struct RecordingRelay {
    pub history: Vec<bool>,
}

impl RecordingRelay {
    pub fn armed(&self) -> Option<bool> {
        self.history.last().copied()
    }
}

impl SecurityRelay for RecordingRelay {
    fn set_armed(&mut self, armed: bool) {
        self.history.push(armed);
    }
}

/// PWM channel with a configurable resolution
#[derive(Debug)]
pub struct FakePwm {
    pub max: u16,
    pub duty: u16,
    pub fail: bool,
}

impl FakePwm {
    pub fn with_max(max: u16) -> Self {
        Self {
            max,
            duty: 0,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            max: 255,
            duty: 0,
            fail: true,
        }
    }
}

impl pwm::ErrorType for FakePwm {
    type Error = pwm::ErrorKind;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.fail {
            return Err(pwm::ErrorKind::Other);
        }
        self.duty = duty;
        Ok(())
    }
}

/// PWM channel that cannot fail, with a percent-resolution timer
#[derive(Debug, Default)]
pub struct PercentPwm {
    pub duty: u16,
}

impl pwm::ErrorType for PercentPwm {
    type Error = Infallible;
}

impl SetDutyCycle for PercentPwm {
    fn max_duty_cycle(&self) -> u16 {
        100
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty;
        Ok(())
    }
}

/// GPIO output pin
#[derive(Debug, Default)]
pub struct FakePin {
    pub high: Option<bool>,
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = Some(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = Some(true);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Network
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeRadioError {
    ScanFailed,
    JoinRejected,
}

/// Wi-Fi station. The link comes up after `link_delay_polls` status checks
/// following a join request.
#[derive(Debug)]
pub struct FakeWifi {
    pub visible: Vec<(String, i16)>,
    pub stored: Option<String>,
    pub link_delay_polls: u32,
    pub failing_scans: usize,
    pub failing_joins: usize,
    pub address: Ipv4Addr,

    pub scans: usize,
    pub joins: Vec<String>,
    pub stored_joins: usize,
    pub forgets: usize,
    pub status_checks: Cell<usize>,
    link_countdown: Cell<Option<u32>>,
}

impl FakeWifi {
    pub fn new(visible: &[(&str, i16)]) -> Self {
        Self {
            visible: visible
                .iter()
                .map(|(ssid, rssi)| (ssid.to_string(), *rssi))
                .collect(),
            stored: None,
            link_delay_polls: 0,
            failing_scans: 0,
            failing_joins: 0,
            address: Ipv4Addr::new(192, 168, 1, 42),
            scans: 0,
            joins: Vec::new(),
            stored_joins: 0,
            forgets: 0,
            status_checks: Cell::new(0),
            link_countdown: Cell::new(None),
        }
    }

    pub fn with_stored(mut self, ssid: &str) -> Self {
        self.stored = Some(ssid.to_string());
        self
    }

    pub fn with_link_delay(mut self, polls: u32) -> Self {
        self.link_delay_polls = polls;
        self
    }

    pub fn drop_link(&self) {
        self.link_countdown.set(None);
    }

    fn start_join(&self) {
        self.link_countdown.set(Some(self.link_delay_polls));
    }
}

impl WifiTransport for FakeWifi {
    type Error = FakeRadioError;

    async fn scan(&mut self) -> Result<ScanResults, Self::Error> {
        self.scans += 1;
        if self.failing_scans > 0 {
            self.failing_scans -= 1;
            return Err(FakeRadioError::ScanFailed);
        }

        let mut results = ScanResults::new();
        for (ssid, rssi) in &self.visible {
            let _ = results.push(ScanEntry::new(ssid, *rssi));
        }
        Ok(results)
    }

    fn has_stored_credentials(&self) -> bool {
        self.stored.is_some()
    }

    async fn connect_stored(&mut self) -> Result<(), Self::Error> {
        self.stored_joins += 1;
        self.start_join();
        Ok(())
    }

    async fn connect(&mut self, ssid: &str, _password: &str) -> Result<(), Self::Error> {
        self.joins.push(ssid.to_string());
        if self.failing_joins > 0 {
            self.failing_joins -= 1;
            return Err(FakeRadioError::JoinRejected);
        }
        self.stored = Some(ssid.to_string());
        self.start_join();
        Ok(())
    }

    fn link_status(&self) -> LinkStatus {
        self.status_checks.set(self.status_checks.get() + 1);
        match self.link_countdown.get() {
            Some(0) => LinkStatus::Up,
            Some(n) => {
                self.link_countdown.set(Some(n - 1));
                LinkStatus::Down
            }
            None => LinkStatus::Down,
        }
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        match self.link_countdown.get() {
            Some(0) => Some(self.address),
            _ => None,
        }
    }

    fn forget_stored_credentials(&mut self) {
        self.forgets += 1;
        self.stored = None;
    }
}

// -----------------------------------------------------------------------------
// Messaging
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMqttError {
    /// Connection refused with a transport state code
    Refused(i32),
    SubscribeRejected,
}

/// MQTT client backed by an in-memory broker queue.
///
/// The broker only queues messages for a connected client, like a
/// clean-session broker.
#[derive(Debug, Default)]
pub struct FakeMqtt {
    pub connected: bool,
    pub refuse_connects: usize,
    pub reject_subscribe: Option<String>,
    pub inbox: VecDeque<(String, Vec<u8>)>,

    pub connects: Vec<String>,
    pub subscriptions: Vec<String>,
    pub disconnects: usize,
    pub polls: usize,
}

impl FakeMqtt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish from the broker side; dropped while the client is offline
    pub fn deliver(&mut self, topic: &str, payload: &[u8]) {
        if self.connected {
            self.inbox.push_back((topic.to_string(), payload.to_vec()));
        }
    }

    pub fn drop_connection(&mut self) {
        self.connected = false;
        self.inbox.clear();
    }
}

impl MessagingClient for FakeMqtt {
    type Error = FakeMqttError;

    async fn connect(&mut self, client_id: &'static str) -> Result<(), Self::Error> {
        self.connects.push(client_id.to_string());
        if self.refuse_connects > 0 {
            self.refuse_connects -= 1;
            return Err(FakeMqttError::Refused(-2));
        }
        self.connected = true;
        Ok(())
    }

    async fn subscribe(&mut self, topic: &'static str) -> Result<(), Self::Error> {
        if self.reject_subscribe.as_deref() == Some(topic) {
            return Err(FakeMqttError::SubscribeRejected);
        }
        self.subscriptions.push(topic.to_string());
        Ok(())
    }

    async fn poll(&mut self, handler: &mut dyn MessageHandler) -> Result<usize, Self::Error> {
        self.polls += 1;
        let mut count = 0;
        while let Some((topic, payload)) = self.inbox.pop_front() {
            handler.on_message(&topic, &payload);
            count += 1;
        }
        Ok(count)
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn disconnect(&mut self) {
        self.disconnects += 1;
        self.connected = false;
    }
}

/// Handler recording every message it receives
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub received: Vec<(String, Vec<u8>)>,
}

impl MessageHandler for RecordingHandler {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        self.received.push((topic.to_string(), payload.to_vec()));
    }
}

// -----------------------------------------------------------------------------
// Time
// -----------------------------------------------------------------------------

/// Delay that returns immediately and adds up the requested time
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub total_ns: u64,
    pub waits: usize,
}

impl FakeDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.waits += 1;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += u64::from(ms) * 1_000_000;
        self.waits += 1;
    }
}
