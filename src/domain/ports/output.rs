use crate::domain::entity::{Channel, ChannelLevels, DeviceState};

/// Tri-channel dimmable light output.
pub trait LightOutput {
    /// Drive one channel with a level in `0..=255`
    fn set_channel(&mut self, channel: Channel, level: u8);

    /// Drive every channel with the given levels
    fn apply_levels(&mut self, levels: ChannelLevels) {
        for channel in Channel::ALL {
            self.set_channel(channel, levels.level(channel));
        }
    }

    /// Derive the output levels from `state` and apply them
    fn apply_state(&mut self, state: &DeviceState) {
        self.apply_levels(state.output_levels());
    }
}

/// Binary security relay output
pub trait SecurityRelay {
    fn set_armed(&mut self, armed: bool);
}
