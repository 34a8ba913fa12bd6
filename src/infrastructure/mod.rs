//! Infrastructure layer - Port implementations
//!
//! Output drivers over `embedded-hal` traits, and the tasks that keep the
//! network link and the MQTT session alive.

pub mod drivers;
pub mod tasks;
