pub mod device;
pub mod messaging;
pub mod network;
pub mod output;

pub use device::*;
pub use messaging::*;
pub use network::*;
pub use output::*;
