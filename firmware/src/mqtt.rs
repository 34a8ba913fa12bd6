//! MQTT client over an embassy-net TCP connection

use core::fmt;
use core::net::{Ipv4Addr, SocketAddr};

use embassy_net::dns::DnsQueryType;
use embassy_net::tcp::client::{TcpClient, TcpConnection};
use embassy_net::tcp::Error as TcpError;
use embassy_net::{IpAddress, Stack};
use embassy_time::with_timeout;
use embedded_io_async::{Read, Write};
use log::{debug, info, warn};
use myrtio_mqtt::client::{MqttClient, MqttEvent, MqttOptions};
use myrtio_mqtt::error::MqttError;
use myrtio_mqtt::packet::QoS;
use myrtio_mqtt::transport::MqttTransport;

use hobby_house::config::BrokerConfig;
use hobby_house::domain::ports::{MessageHandler, MessagingClient};

use crate::config;

const MQTT_MAX_TOPICS: usize = 4;
const MQTT_BUF_SIZE: usize = 512;
pub(crate) const TCP_BUF_SIZE: usize = 1024;

pub(crate) type BrokerTcpClient = TcpClient<'static, 1, TCP_BUF_SIZE, TCP_BUF_SIZE>;
type BrokerConnection = TcpConnection<'static, 1, TCP_BUF_SIZE, TCP_BUF_SIZE>;

/// TCP connection carrying the MQTT byte stream
pub(crate) struct ConnectionTransport {
    conn: BrokerConnection,
}

impl MqttTransport for ConnectionTransport {
    type Error = TcpError;

    async fn send(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        self.conn.write_all(buf).await
    }

    async fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.conn.read(buf).await
    }
}

#[derive(Debug)]
pub(crate) enum BrokerError {
    /// Broker host did not resolve to an IPv4 address
    Resolve,
    Tcp(TcpError),
    Mqtt(MqttError<TcpError>),
    NotConnected,
}

impl fmt::Display for BrokerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerError::Resolve => write!(f, "failed to resolve broker host"),
            BrokerError::Tcp(e) => write!(f, "TCP connect failed: {:?}", e),
            BrokerError::Mqtt(e) => write!(f, "protocol error: {:?}", e),
            BrokerError::NotConnected => write!(f, "not connected"),
        }
    }
}

/// Broker session; the TCP connection lives as long as the session
pub(crate) struct BrokerClient {
    stack: Stack<'static>,
    tcp: &'static BrokerTcpClient,
    broker: BrokerConfig,
    mqtt: Option<MqttClient<ConnectionTransport, MQTT_MAX_TOPICS, MQTT_BUF_SIZE>>,
}

impl BrokerClient {
    pub(crate) fn new(
        stack: Stack<'static>,
        tcp: &'static BrokerTcpClient,
        broker: BrokerConfig,
    ) -> Self {
        Self {
            stack,
            tcp,
            broker,
            mqtt: None,
        }
    }
}

impl MessagingClient for BrokerClient {
    type Error = BrokerError;

    async fn connect(&mut self, client_id: &'static str) -> Result<(), Self::Error> {
        self.mqtt = None;

        let address = resolve_host(self.stack, self.broker.host).await?;
        info!("mqtt: connecting to broker {}:{}", address, self.broker.port);

        let remote = SocketAddr::new(address.into(), self.broker.port);
        let conn = self.tcp.connect(remote).await.map_err(BrokerError::Tcp)?;

        let options = MqttOptions::new(client_id).with_keep_alive(config::MQTT_KEEP_ALIVE);
        let mut mqtt = MqttClient::new(ConnectionTransport { conn }, options);
        mqtt.connect().await.map_err(BrokerError::Mqtt)?;

        self.mqtt = Some(mqtt);
        Ok(())
    }

    async fn subscribe(&mut self, topic: &'static str) -> Result<(), Self::Error> {
        let mqtt = self.mqtt.as_mut().ok_or(BrokerError::NotConnected)?;
        mqtt.subscribe(topic, QoS::AtMostOnce)
            .await
            .map_err(BrokerError::Mqtt)
    }

    async fn poll(&mut self, handler: &mut dyn MessageHandler) -> Result<usize, Self::Error> {
        let mqtt = self.mqtt.as_mut().ok_or(BrokerError::NotConnected)?;

        let result = match with_timeout(config::MQTT_POLL_WINDOW, mqtt.poll()).await {
            Err(_) => Ok(0),
            Ok(Ok(Some(MqttEvent::Publish(msg)))) => {
                handler.on_message(msg.topic, msg.payload);
                Ok(1)
            }
            Ok(Ok(_)) => Ok(0),
            Ok(Err(e)) => Err(e),
        };

        result.map_err(|e| {
            warn!("mqtt: connection lost: {:?}", e);
            self.mqtt = None;
            BrokerError::Mqtt(e)
        })
    }

    fn is_connected(&self) -> bool {
        self.mqtt.is_some()
    }

    async fn disconnect(&mut self) {
        if self.mqtt.take().is_some() {
            debug!("mqtt: session dropped");
        }
    }
}

#[allow(irrefutable_let_patterns)]
async fn resolve_host(stack: Stack<'static>, host: &str) -> Result<Ipv4Addr, BrokerError> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(ip);
    }

    let addresses = stack
        .dns_query(host, DnsQueryType::A)
        .await
        .map_err(|_| BrokerError::Resolve)?;
    addresses
        .iter()
        .find_map(|address| {
            if let IpAddress::Ipv4(ip) = address {
                Some(*ip)
            } else {
                None
            }
        })
        .ok_or(BrokerError::Resolve)
}
