use log::{debug, info};

use crate::domain::{
    dto::{LightChangeIntent, SecurityCommand},
    entity::DeviceState,
    ports::{
        DeviceStateReader, LightOutput, LightStateChanger, SecurityRelay, SecurityStateChanger,
    },
};

/// Owner of the device state and the two physical outputs.
///
/// Every state mutation goes through this type, which keeps the outputs in
/// step with the state.
pub struct DeviceUsecases<O: LightOutput, R: SecurityRelay> {
    state: DeviceState,
    light: O,
    relay: R,
}

impl<O: LightOutput, R: SecurityRelay> DeviceUsecases<O, R> {
    pub fn new(light: O, relay: R) -> Self {
        Self::with_state(DeviceState::new(), light, relay)
    }

    pub fn with_state(state: DeviceState, light: O, relay: R) -> Self {
        Self {
            state,
            light,
            relay,
        }
    }

    /// Drive both outputs from the current state.
    ///
    /// Called once at power-up so the relay starts armed and the light
    /// reflects the default state.
    pub fn boot(&mut self) {
        self.relay.set_armed(self.state.is_security_armed());
        self.light.apply_state(&self.state);
        info!(
            "device: outputs initialised, security armed: {}",
            self.state.is_security_armed()
        );
    }

    pub fn light(&self) -> &O {
        &self.light
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }
}

impl<O: LightOutput, R: SecurityRelay> DeviceStateReader for DeviceUsecases<O, R> {
    fn device_state(&self) -> DeviceState {
        self.state
    }
}

impl<O: LightOutput, R: SecurityRelay> LightStateChanger for DeviceUsecases<O, R> {
    fn apply_light_intent(&mut self, intent: LightChangeIntent) {
        intent.apply_to(&mut self.state);
        let levels = self.state.output_levels();
        self.light.apply_levels(levels);
        debug!(
            "light: output r={} g={} b={}",
            levels.red, levels.green, levels.blue
        );
    }
}

impl<O: LightOutput, R: SecurityRelay> SecurityStateChanger for DeviceUsecases<O, R> {
    fn apply_security_command(&mut self, command: SecurityCommand) {
        let armed = command.is_armed();
        self.relay.set_armed(armed);
        self.state.set_security_armed(armed);
    }
}
