//! Wi-Fi station on the ESP32 radio

use core::fmt;
use core::net::Ipv4Addr;

use embassy_net::{DhcpConfig, Runner, Stack, StackResources};
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_radio::wifi::{
    ClientConfig, Config as WifiConfig, ModeConfig, ScanConfig, WifiController, WifiDevice,
    WifiError, WifiStaState,
};
use heapless::String;
use log::debug;
use static_cell::make_static;

use hobby_house::domain::ports::{
    LinkStatus, MAX_SCAN_RESULTS, ScanEntry, ScanResults, Ssid, WifiTransport,
};

use crate::config;

const MAX_CONNECTIONS: usize = 3;

type Password = String<64>;

pub(crate) fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*make_static!(esp_radio::init().expect("radio init failed"));
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, WifiConfig::default())
            .expect("wifi init failed");

    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = String::try_from(config::HOSTNAME).ok();
    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = make_static!(StackResources::<MAX_CONNECTIONS>::new());
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, network_resources, get_seed());

    (stack, runner, controller)
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}

/// Background task for running the network stack
#[embassy_executor::task]
pub(crate) async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

#[derive(Debug)]
pub(crate) enum RadioError {
    Driver(WifiError),
    /// Rejoin requested with nothing stored
    NoStoredCredentials,
    /// Credentials do not fit the station buffers
    CredentialsTooLong,
}

impl From<WifiError> for RadioError {
    fn from(e: WifiError) -> Self {
        RadioError::Driver(e)
    }
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadioError::Driver(e) => write!(f, "driver error: {:?}", e),
            RadioError::NoStoredCredentials => write!(f, "no stored credentials"),
            RadioError::CredentialsTooLong => write!(f, "credentials too long"),
        }
    }
}

/// Station adapter.
///
/// The last joined network is kept in RAM and stands in for the credentials
/// the radio would persist between joins.
pub(crate) struct EspWifi {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    stored: Option<(Ssid, Password)>,
}

impl EspWifi {
    pub(crate) fn new(controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self {
            controller,
            stack,
            stored: None,
        }
    }

    async fn ensure_started(&mut self) -> Result<(), RadioError> {
        if !matches!(self.controller.is_started(), Ok(true)) {
            self.controller
                .set_config(&ModeConfig::Client(ClientConfig::default()))?;
            self.controller.start_async().await?;
        }
        Ok(())
    }

    async fn join(&mut self, ssid: &str, password: &str) -> Result<(), RadioError> {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            if let Err(e) = self.controller.disconnect_async().await {
                debug!("network: disconnect before rejoin failed: {:?}", e);
            }
        }

        let client_config = ClientConfig::default()
            .with_ssid(ssid.into())
            .with_password(password.into());
        self.controller
            .set_config(&ModeConfig::Client(client_config))?;
        self.ensure_started().await?;
        self.controller.connect_async().await?;
        Ok(())
    }
}

impl WifiTransport for EspWifi {
    type Error = RadioError;

    async fn scan(&mut self) -> Result<ScanResults, Self::Error> {
        self.ensure_started().await?;
        let found = self
            .controller
            .scan_with_config_async(ScanConfig::default().with_max(MAX_SCAN_RESULTS))
            .await?;

        let mut results = ScanResults::new();
        for ap in &found {
            debug!("network: seen {} rssi {}", ap.ssid, ap.signal_strength);
            if results
                .push(ScanEntry::new(ap.ssid.as_str(), i16::from(ap.signal_strength)))
                .is_err()
            {
                break;
            }
        }
        Ok(results)
    }

    fn has_stored_credentials(&self) -> bool {
        self.stored.is_some()
    }

    async fn connect_stored(&mut self) -> Result<(), Self::Error> {
        let (ssid, password) = self
            .stored
            .clone()
            .ok_or(RadioError::NoStoredCredentials)?;
        self.join(ssid.as_str(), password.as_str()).await
    }

    async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), Self::Error> {
        let ssid_buf = Ssid::try_from(ssid).map_err(|()| RadioError::CredentialsTooLong)?;
        let password_buf =
            Password::try_from(password).map_err(|()| RadioError::CredentialsTooLong)?;
        self.join(ssid, password).await?;
        self.stored = Some((ssid_buf, password_buf));
        Ok(())
    }

    fn link_status(&self) -> LinkStatus {
        let associated = esp_radio::wifi::sta_state() == WifiStaState::Connected;
        if associated && self.stack.is_link_up() && self.stack.config_v4().is_some() {
            LinkStatus::Up
        } else {
            LinkStatus::Down
        }
    }

    fn local_address(&self) -> Option<Ipv4Addr> {
        self.stack.config_v4().map(|config| config.address.address())
    }

    fn forget_stored_credentials(&mut self) {
        self.stored = None;
    }
}
