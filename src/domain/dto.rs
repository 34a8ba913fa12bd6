use crate::domain::entity::{DeviceState, Rgb};

/// Partial update of the light part of the device state.
///
/// Every field is optional; `None` leaves the state component unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightChangeIntent {
    pub color: Option<Rgb>,
    /// Brightness in percent
    pub brightness: Option<u8>,
    pub active: Option<bool>,
    pub enabled: Option<bool>,
}

impl LightChangeIntent {
    /// Create a new empty intent (no changes)
    pub const fn new() -> Self {
        Self {
            color: None,
            brightness: None,
            active: None,
            enabled: None,
        }
    }

    #[must_use]
    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.brightness.is_none()
            && self.active.is_none()
            && self.enabled.is_none()
    }

    /// Write the present fields into `state`
    pub fn apply_to(&self, state: &mut DeviceState) {
        if let Some(color) = self.color {
            state.set_color(color);
        }
        if let Some(brightness) = self.brightness {
            state.set_brightness(brightness);
        }
        if let Some(active) = self.active {
            state.set_active(active);
        }
        if let Some(enabled) = self.enabled {
            state.set_enabled(enabled);
        }
    }
}

/// Requested state of the security relay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecurityCommand {
    Arm,
    Disarm,
}

impl SecurityCommand {
    /// Parse the `state` field of a security message
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "on" => Some(SecurityCommand::Arm),
            "off" => Some(SecurityCommand::Disarm),
            _ => None,
        }
    }

    pub const fn is_armed(self) -> bool {
        matches!(self, SecurityCommand::Arm)
    }
}
