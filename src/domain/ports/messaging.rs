use core::fmt;

/// Receiver of inbound MQTT publishes
pub trait MessageHandler {
    fn on_message(&mut self, topic: &str, payload: &[u8]);
}

impl<H: MessageHandler + ?Sized> MessageHandler for &mut H {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        (**self).on_message(topic, payload);
    }
}

/// MQTT client as seen by the session manager.
///
/// Inbound traffic is serviced by [`MessagingClient::poll`], which hands
/// every publish received since the last call to the handler.
#[allow(async_fn_in_trait)]
pub trait MessagingClient {
    type Error: fmt::Debug;

    /// Open a session with the broker under `client_id`
    async fn connect(&mut self, client_id: &'static str) -> Result<(), Self::Error>;

    async fn subscribe(&mut self, topic: &'static str) -> Result<(), Self::Error>;

    /// Service the connection once and dispatch received publishes.
    ///
    /// Returns the number of messages dispatched. Must not wait for traffic
    /// indefinitely.
    async fn poll(&mut self, handler: &mut dyn MessageHandler) -> Result<usize, Self::Error>;

    fn is_connected(&self) -> bool;

    async fn disconnect(&mut self);
}
