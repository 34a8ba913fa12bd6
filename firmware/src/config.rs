use embassy_time::Duration;
use hobby_house::config::{
    BrokerConfig, DEFAULT_LINK_POLL_INTERVAL, NetworkCandidate, NetworkConfig, NodeConfig, Topics,
};

pub(crate) const HOSTNAME: &str = "hobby-house";

/// PWM carrier of the light channels
pub(crate) const PWM_FREQUENCY_KHZ: u32 = 10;

/// How long one control loop tick waits for broker traffic
pub(crate) const MQTT_POLL_WINDOW: Duration = Duration::from_millis(50);

pub(crate) const MQTT_KEEP_ALIVE: Duration = Duration::from_secs(15);

const CANDIDATES: [NetworkCandidate; 2] = [
    NetworkCandidate::new(env!("WIFI_PRIMARY_SSID"), env!("WIFI_PRIMARY_PASSWORD")),
    NetworkCandidate::new(env!("WIFI_SECONDARY_SSID"), env!("WIFI_SECONDARY_PASSWORD")),
];

pub(crate) const NODE: NodeConfig = NodeConfig {
    network: NetworkConfig {
        candidates: &CANDIDATES,
        link_poll_interval: DEFAULT_LINK_POLL_INTERVAL,
        forget_credentials_on_boot: true,
    },
    broker: BrokerConfig {
        host: env!("MQTT_HOST"),
        port: 1883,
        client_id: env!("MQTT_CLIENT_ID"),
    },
    topics: Topics::new("hobby/security", "hobby/lights"),
};
