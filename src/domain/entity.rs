/// RGB colour, one byte per channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Light output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub const fn as_str(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

/// Levels to drive the three light channels with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLevels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ChannelLevels {
    pub const OFF: ChannelLevels = ChannelLevels::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn level(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

/// Commanded state of the node.
///
/// Fields are private; every write goes through a setter so the usecases
/// stay the single writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    color: Rgb,
    brightness: u8,
    active: bool,
    enabled: bool,
    security_armed: bool,
}

impl DeviceState {
    /// Power-up state: white at half brightness, inactive, enabled and armed
    pub const fn new() -> Self {
        Self {
            color: Rgb::WHITE,
            brightness: 50,
            active: false,
            enabled: true,
            security_armed: true,
        }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Brightness in percent
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_security_armed(&self) -> bool {
        self.security_armed
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_security_armed(&mut self, armed: bool) {
        self.security_armed = armed;
    }

    /// Derive the light channel levels from the state.
    ///
    /// Disabled or inactive lights are dark. Otherwise every channel is
    /// scaled by the brightness percentage with truncating integer division.
    pub fn output_levels(&self) -> ChannelLevels {
        if !self.enabled || !self.active {
            return ChannelLevels::OFF;
        }

        ChannelLevels::new(
            scale(self.color.r, self.brightness),
            scale(self.color.g, self.brightness),
            scale(self.color.b, self.brightness),
        )
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

fn scale(value: u8, brightness: u8) -> u8 {
    let scaled = u16::from(value) * u16::from(brightness) / 100;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}
