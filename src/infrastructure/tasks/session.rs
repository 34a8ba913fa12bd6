//! MQTT session management
//!
//! Opens the broker session, subscribes to the command topics and services
//! inbound traffic. A session only lives while the client reports itself
//! connected; after a loss it is closed and opened again from scratch.

use core::fmt;

use log::{error, info, warn};

use crate::config::Topics;
use crate::domain::ports::{MessageHandler, MessagingClient};

#[derive(Debug)]
pub enum SessionError<E> {
    /// Broker refused or did not answer the connection
    Connect(E),
    /// Subscription to a command topic failed
    Subscribe(&'static str, E),
}

impl<E: fmt::Debug> fmt::Display for SessionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Connect(e) => write!(f, "error connecting to MQTT: {:?}", e),
            SessionError::Subscribe(topic, e) => {
                write!(f, "error subscribing to {}: {:?}", topic, e)
            }
        }
    }
}

pub struct SessionManager<C: MessagingClient> {
    client: C,
    client_id: &'static str,
    topics: Topics,
}

impl<C: MessagingClient> SessionManager<C> {
    pub fn new(client: C, client_id: &'static str, topics: Topics) -> Self {
        Self {
            client,
            client_id,
            topics,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// Connect and subscribe to the command topics.
    ///
    /// A refused subscription tears the connection down again, so the caller
    /// sees a closed session and retries the whole sequence.
    pub async fn open(&mut self) -> Result<(), SessionError<C::Error>> {
        if let Err(e) = self.client.connect(self.client_id).await {
            let e = SessionError::Connect(e);
            error!("mqtt: {}", e);
            return Err(e);
        }

        for topic in self.topics.subscriptions() {
            if let Err(e) = self.client.subscribe(topic).await {
                let e = SessionError::Subscribe(topic, e);
                error!("mqtt: {}", e);
                self.client.disconnect().await;
                return Err(e);
            }
        }

        info!("mqtt: connected and subscribed");
        Ok(())
    }

    /// Service the session once, dispatching received messages to `handler`.
    ///
    /// Returns the number of dispatched messages; nothing is read while the
    /// session is down.
    pub async fn poll(&mut self, handler: &mut dyn MessageHandler) -> usize {
        if !self.client.is_connected() {
            return 0;
        }

        match self.client.poll(handler).await {
            Ok(count) => count,
            Err(e) => {
                warn!("mqtt: poll error: {:?}", e);
                0
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    pub async fn close(&mut self) {
        self.client.disconnect().await;
    }
}
