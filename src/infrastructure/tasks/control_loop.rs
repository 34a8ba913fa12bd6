//! Top-level control loop
//!
//! One cooperative loop services the MQTT session and, whenever the session
//! is found down, rebuilds the network link and the session before the next
//! message can be processed.

use core::net::Ipv4Addr;

use embedded_hal_async::delay::DelayNs;
use log::{info, warn};

use crate::config::{ConfigError, NodeConfig};
use crate::domain::ports::{MessageHandler, MessagingClient, WifiTransport};
use crate::infrastructure::tasks::network::NetworkReconnector;
use crate::infrastructure::tasks::session::SessionManager;

/// What the boot sequence did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Link up and session open
    Online { address: Option<Ipv4Addr> },
    /// Session could not be opened; the first tick retries it
    SessionDown { address: Option<Ipv4Addr> },
}

/// What one tick of the loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session up; number of messages dispatched
    Serviced(usize),
    /// Session was lost, the link and the session were rebuilt
    Recovered { address: Option<Ipv4Addr> },
    /// Session was lost and reopening it failed; retried on the next tick
    RecoveryFailed,
}

pub struct ControlLoop<T, C, H, D>
where
    T: WifiTransport,
    C: MessagingClient,
    H: MessageHandler,
    D: DelayNs,
{
    transport: T,
    reconnector: NetworkReconnector,
    session: SessionManager<C>,
    handler: H,
    delay: D,
    forget_credentials_on_boot: bool,
}

impl<T, C, H, D> ControlLoop<T, C, H, D>
where
    T: WifiTransport,
    C: MessagingClient,
    H: MessageHandler,
    D: DelayNs,
{
    pub fn new(
        config: &NodeConfig,
        transport: T,
        client: C,
        handler: H,
        delay: D,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            reconnector: NetworkReconnector::new(&config.network)?,
            session: SessionManager::new(client, config.broker.client_id, config.topics),
            handler,
            delay,
            forget_credentials_on_boot: config.network.forget_credentials_on_boot,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn session(&self) -> &SessionManager<C> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager<C> {
        &mut self.session
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn reconnector(&self) -> &NetworkReconnector {
        &self.reconnector
    }

    /// Boot sequence: bring the link up, then open the first session.
    ///
    /// A failed session open is left to the first tick to retry.
    pub async fn start(&mut self) -> StartOutcome {
        if self.forget_credentials_on_boot {
            info!("network: clearing stored credentials to force a scan");
            self.transport.forget_stored_credentials();
        }

        let address = self
            .reconnector
            .reconnect(&mut self.transport, &mut self.delay)
            .await;

        info!("mqtt: starting session");
        match self.session.open().await {
            Ok(()) => StartOutcome::Online { address },
            Err(e) => {
                warn!("mqtt: first session failed, retrying on next tick: {}", e);
                StartOutcome::SessionDown { address }
            }
        }
    }

    pub async fn tick(&mut self) -> TickOutcome {
        let serviced = self.session.poll(&mut self.handler).await;
        if self.session.is_connected() {
            return TickOutcome::Serviced(serviced);
        }

        warn!("mqtt: disconnected");
        self.session.close().await;
        let address = self
            .reconnector
            .reconnect(&mut self.transport, &mut self.delay)
            .await;

        match self.session.open().await {
            Ok(()) => TickOutcome::Recovered { address },
            Err(_) => TickOutcome::RecoveryFailed,
        }
    }

    /// Run the node; never returns
    pub async fn run(&mut self) {
        self.start().await;
        loop {
            self.tick().await;
        }
    }
}
