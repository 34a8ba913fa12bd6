pub mod control_loop;
pub mod network;
pub mod session;

pub use control_loop::{ControlLoop, StartOutcome, TickOutcome};
pub use network::{JoinTarget, LinkState, NetworkError, NetworkReconnector};
pub use session::{SessionError, SessionManager};
