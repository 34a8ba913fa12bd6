use crate::domain::{
    dto::{LightChangeIntent, SecurityCommand},
    entity::DeviceState,
};

/// Reader interface for the device state
pub trait DeviceStateReader {
    /// Get a snapshot of the current device state
    fn device_state(&self) -> DeviceState;
}

/// Applier interface for light intents
pub trait LightStateChanger {
    /// Apply a partial light update and refresh the light output
    fn apply_light_intent(&mut self, intent: LightChangeIntent);
}

/// Immediate security relay action, outside the light derivation path
pub trait SecurityStateChanger {
    fn apply_security_command(&mut self, command: SecurityCommand);
}

/// Port interface for the device usecases
pub trait DeviceUsecasesPort: DeviceStateReader + LightStateChanger + SecurityStateChanger {}

impl<T> DeviceUsecasesPort for T where T: DeviceStateReader + LightStateChanger + SecurityStateChanger
{}
