mod pwm_light;
mod relay;

pub use pwm_light::PwmLightOutput;
pub use relay::GpioSecurityRelay;
