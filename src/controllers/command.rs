//! MQTT command controller
//!
//! Turns inbound publishes into device state changes.

use log::{debug, info, warn};

use crate::config::Topics;
use crate::controllers::payload::{self, PayloadError};
use crate::domain::{
    dto::{LightChangeIntent, SecurityCommand},
    ports::{DeviceUsecasesPort, MessageHandler},
};

/// Result of decoding one inbound message
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Security relay switched
    Security(SecurityCommand),
    /// Security message without a usable `state` value
    SecurityIgnored,
    /// Light fields applied and output refreshed
    Lights(LightChangeIntent),
    /// Payload was dropped without touching the state
    MalformedPayload(PayloadError),
    /// Topic is not one of the command topics
    UnknownTopic,
}

/// Decoder of command messages into device usecase calls
pub struct CommandDecoder<D: DeviceUsecasesPort> {
    topics: Topics,
    device: D,
}

impl<D: DeviceUsecasesPort> CommandDecoder<D> {
    pub fn new(topics: Topics, device: D) -> Self {
        Self { topics, device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Decode one message and apply it
    pub fn decode(&mut self, topic: &str, payload: &[u8]) -> Outcome {
        if topic == self.topics.security {
            return self.decode_security(payload);
        }
        if topic == self.topics.lights {
            return self.decode_lights(payload);
        }

        Outcome::UnknownTopic
    }

    fn decode_security(&mut self, payload: &[u8]) -> Outcome {
        let parsed = match payload::parse_security(payload) {
            Ok(parsed) => parsed,
            Err(e) => return Outcome::MalformedPayload(e),
        };

        let Some(state) = parsed.state else {
            return Outcome::SecurityIgnored;
        };
        info!("command: received security {}", state);

        match SecurityCommand::parse(state) {
            Some(command) => {
                self.device.apply_security_command(command);
                Outcome::Security(command)
            }
            None => Outcome::SecurityIgnored,
        }
    }

    fn decode_lights(&mut self, payload: &[u8]) -> Outcome {
        let parsed = match payload::parse_lights(payload) {
            Ok(parsed) => parsed,
            Err(e) => return Outcome::MalformedPayload(e),
        };

        let intent = parsed.to_intent();
        if let Some(color) = intent.color {
            info!(
                "command: colour red = {}, green = {}, blue = {}",
                color.r, color.g, color.b
            );
        }
        if let Some(brightness) = intent.brightness {
            info!("command: brightness {}", brightness);
        }
        if let Some(active) = intent.active {
            info!("command: active {}", active);
        }
        if let Some(enabled) = intent.enabled {
            info!("command: enabled {}", enabled);
        }

        self.device.apply_light_intent(intent);
        Outcome::Lights(intent)
    }
}

impl<D: DeviceUsecasesPort> MessageHandler for CommandDecoder<D> {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        match self.decode(topic, payload) {
            Outcome::MalformedPayload(e) => {
                warn!("command: dropped message on {}: {}", topic, e);
            }
            Outcome::UnknownTopic => {
                debug!("command: ignored message on unknown topic {}", topic);
            }
            Outcome::SecurityIgnored => {
                debug!("command: security message without usable state");
            }
            Outcome::Security(_) | Outcome::Lights(_) => {}
        }
    }
}
