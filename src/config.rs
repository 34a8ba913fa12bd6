use core::fmt;
use core::time::Duration;

/// Default delay between two link status checks while joining a network
pub const DEFAULT_LINK_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A Wi-Fi network the node is willing to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkCandidate {
    pub ssid: &'static str,
    pub password: &'static str,
}

impl NetworkCandidate {
    pub const fn new(ssid: &'static str, password: &'static str) -> Self {
        Self { ssid, password }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    /// Known networks, in declaration order. Order breaks signal ties.
    pub candidates: &'static [NetworkCandidate],
    pub link_poll_interval: Duration,
    /// Drop credentials cached by the radio at boot so the first join always scans
    pub forget_credentials_on_boot: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BrokerConfig {
    pub host: &'static str,
    pub port: u16,
    pub client_id: &'static str,
}

/// Command topics the node subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topics {
    pub security: &'static str,
    pub lights: &'static str,
}

impl Topics {
    pub const fn new(security: &'static str, lights: &'static str) -> Self {
        Self { security, lights }
    }

    /// Topics subscribed on every session open, in subscription order
    pub const fn subscriptions(&self) -> [&'static str; 2] {
        [self.security, self.lights]
    }
}

impl Default for Topics {
    fn default() -> Self {
        Self::new("hobby/security", "hobby/lights")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NodeConfig {
    pub network: NetworkConfig,
    pub broker: BrokerConfig,
    pub topics: Topics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No candidate network configured
    NoCandidates,
    /// Broker client identifier is empty
    EmptyClientId,
    /// A candidate network has an empty SSID
    EmptySsid,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoCandidates => write!(f, "no candidate network configured"),
            ConfigError::EmptyClientId => write!(f, "empty MQTT client id"),
            ConfigError::EmptySsid => write!(f, "candidate network with empty SSID"),
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidates.is_empty() {
            return Err(ConfigError::NoCandidates);
        }
        if self.candidates.iter().any(|c| c.ssid.is_empty()) {
            return Err(ConfigError::EmptySsid);
        }
        Ok(())
    }
}

impl NodeConfig {
    /// Check the configuration before handing it to the control loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.network.validate()?;
        if self.broker.client_id.is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(())
    }
}
