//! Command payload structures
//!
//! These types match the JSON documents published on the command topics.
//! Every field is optional; absent fields leave the device state untouched.

use core::fmt;

use log::debug;
use serde::Deserialize;

use crate::domain::{dto::LightChangeIntent, entity::Rgb};

/// Payload of the security topic, e.g. `{"state":"on"}`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SecurityPayload<'a> {
    #[serde(default, borrow)]
    pub state: Option<&'a str>,
}

/// Colour object of the lights topic. Missing channels read as 0.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ColourPayload {
    #[serde(default)]
    pub red: f64,
    #[serde(default)]
    pub green: f64,
    #[serde(default)]
    pub blue: f64,
}

/// Payload of the lights topic.
///
/// Each field is decoded on its own, so a field of the wrong type reads as
/// absent without discarding its siblings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightsPayload {
    pub colour: Option<ColourPayload>,
    pub brightness: Option<f64>,
    pub active: Option<bool>,
    pub enabled: Option<bool>,
}

impl LightsPayload {
    /// Convert to a light intent, saturating out-of-range numbers
    pub fn to_intent(&self) -> LightChangeIntent {
        LightChangeIntent {
            color: self.colour.map(|c| {
                Rgb::new(saturate_channel(c.red), saturate_channel(c.green), saturate_channel(c.blue))
            }),
            brightness: self.brightness.map(saturate_percent),
            active: self.active,
            enabled: self.enabled,
        }
    }
}

// Any JSON object, fields skipped
#[allow(clippy::empty_structs_with_brackets)]
#[derive(Deserialize)]
struct Envelope {}

#[derive(Deserialize)]
struct ColourField {
    #[serde(default)]
    colour: Option<ColourPayload>,
}

#[derive(Deserialize)]
struct BrightnessField {
    #[serde(default)]
    brightness: Option<f64>,
}

#[derive(Deserialize)]
struct ActiveField {
    #[serde(default)]
    active: Option<bool>,
}

#[derive(Deserialize)]
struct EnabledField {
    #[serde(default)]
    enabled: Option<bool>,
}

/// Payload could not be decoded
#[derive(Debug, PartialEq)]
pub enum PayloadError {
    /// Not a JSON document of the expected shape
    Json(serde_json_core::de::Error),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Json(e) => write!(f, "JSON deserialization error: {:?}", e),
        }
    }
}

impl From<serde_json_core::de::Error> for PayloadError {
    fn from(e: serde_json_core::de::Error) -> Self {
        PayloadError::Json(e)
    }
}

pub fn parse_security(payload: &[u8]) -> Result<SecurityPayload<'_>, PayloadError> {
    let (parsed, _) = serde_json_core::from_slice::<SecurityPayload<'_>>(payload)?;
    Ok(parsed)
}

/// Decode a lights document.
///
/// Only a payload that is not a JSON object is an error.
pub fn parse_lights(payload: &[u8]) -> Result<LightsPayload, PayloadError> {
    serde_json_core::from_slice::<Envelope>(payload)?;

    Ok(LightsPayload {
        colour: field::<ColourField>(payload, "colour").and_then(|f| f.colour),
        brightness: field::<BrightnessField>(payload, "brightness").and_then(|f| f.brightness),
        active: field::<ActiveField>(payload, "active").and_then(|f| f.active),
        enabled: field::<EnabledField>(payload, "enabled").and_then(|f| f.enabled),
    })
}

/// Decode one field of an object, other fields skipped
fn field<'a, T: Deserialize<'a>>(payload: &'a [u8], name: &str) -> Option<T> {
    match serde_json_core::from_slice::<T>(payload) {
        Ok((parsed, _)) => Some(parsed),
        Err(e) => {
            debug!("command: ignoring unusable {} field: {:?}", name, e);
            None
        }
    }
}

// Fractions truncate toward zero
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturate_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturate_percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0) as u8
}
