//! missive is an interactive shell for putting together one email at a time:
//! credentials, server, receivers, subject, body, attachments, and an
//! optional HTML rendering, entered one command per line and submitted over
//! an encrypted SMTP connection. Sessions can be saved to and restored from
//! JSON documents.

pub mod compose;
pub mod logging;
pub mod persist;
pub mod shell;
pub mod transport;

pub use tracing;
