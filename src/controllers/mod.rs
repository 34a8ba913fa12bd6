mod command;
pub mod payload;

pub use command::{CommandDecoder, Outcome};
