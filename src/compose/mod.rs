pub mod command;
pub mod error;
pub mod sniff;
pub mod state;

pub use command::Command;
pub use error::ComposeError;
pub use state::{Attachment, BodyCapture, ComposeState, Preset};
