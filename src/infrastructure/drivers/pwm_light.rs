use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::domain::{entity::Channel, ports::LightOutput};

/// Full scale of a channel level
const LEVEL_RANGE: u16 = 255;

/// RGB light driven by three PWM channels.
///
/// A level of `0..=255` is written as the duty fraction `level / 255`, so the
/// driver works with any timer resolution.
pub struct PwmLightOutput<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R, G, B> PwmLightOutput<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    pub fn new(red: R, green: G, blue: B) -> Self {
        Self { red, green, blue }
    }

    pub fn channels(&self) -> (&R, &G, &B) {
        (&self.red, &self.green, &self.blue)
    }
}

impl<R, G, B> LightOutput for PwmLightOutput<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: SetDutyCycle,
{
    fn set_channel(&mut self, channel: Channel, level: u8) {
        let level = u16::from(level);
        // Each channel has its own error type
        let written = match channel {
            Channel::Red => write_duty(&mut self.red, level).is_ok(),
            Channel::Green => write_duty(&mut self.green, level).is_ok(),
            Channel::Blue => write_duty(&mut self.blue, level).is_ok(),
        };
        if !written {
            warn!("light: failed to set {} channel duty", channel.as_str());
        }
    }
}

fn write_duty<P: SetDutyCycle>(pin: &mut P, level: u16) -> Result<(), P::Error> {
    pin.set_duty_cycle_fraction(level, LEVEL_RANGE)
}
