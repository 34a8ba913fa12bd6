use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::domain::ports::SecurityRelay;

/// Security relay on a GPIO pin; the pin is high while armed
pub struct GpioSecurityRelay<P> {
    pin: P,
}

impl<P: OutputPin> GpioSecurityRelay<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: OutputPin> SecurityRelay for GpioSecurityRelay<P> {
    fn set_armed(&mut self, armed: bool) {
        let result = if armed {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        match result {
            Ok(()) => info!("security: relay {}", if armed { "armed" } else { "disarmed" }),
            Err(_) => warn!("security: failed to drive relay pin"),
        }
    }
}
