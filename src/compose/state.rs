//! The session's compose-time state and the operations that mutate it.
//!
//! One [`ComposeState`] exists per session, owned by the shell. Every
//! mutation goes through the operations here; each either fully applies or
//! leaves the state untouched. None of them performs I/O: file contents and
//! interactively prompted values arrive already read.

use core::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::{error::ComposeError, sniff};

/// Server used when no other has been configured.
pub const DEFAULT_SERVER: &str = "smtp.gmail.com";
/// Port used when no other has been configured (SMTP over implicit TLS).
pub const DEFAULT_PORT: u16 = 465;

/// The line that ends a multi-line body capture.
pub const BODY_TERMINATOR: &str = "end";

/// Everything entered so far for the email in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeState {
    pub username: String,
    pub password: String,
    pub server: String,
    pub port: u16,
    /// Insertion order is significant: it decides the `To` header order and
    /// the positional index used by removal.
    pub receivers: Vec<String>,
    pub subject: String,
    pub body: String,
    pub html: String,
    /// Append-only through commands; order is preserved in the outgoing
    /// message.
    pub attachments: Vec<Attachment>,
}

impl Default for ComposeState {
    fn default() -> Self {
        Self {
            username: String::default(),
            password: String::default(),
            server: DEFAULT_SERVER.to_owned(),
            port: DEFAULT_PORT,
            receivers: Vec::default(),
            subject: String::default(),
            body: String::default(),
            html: String::default(),
            attachments: Vec::default(),
        }
    }
}

impl ComposeState {
    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_owned();
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_owned();
    }

    /// Replaces both credential fields at once, so a session never observes
    /// a username belonging to one account paired with the password of
    /// another.
    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.username = username.to_owned();
        self.password = password.to_owned();
    }

    pub fn set_server(&mut self, server: &str) {
        self.server = server.to_owned();
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn set_subject(&mut self, subject: &str) {
        self.subject = subject.to_owned();
    }

    pub fn set_body(&mut self, body: String) {
        self.body = body;
    }

    pub fn set_html(&mut self, html: String) {
        self.html = html;
    }

    pub fn add_receiver(&mut self, address: &str) {
        self.receivers.push(address.to_owned());
    }

    /// Removes and returns the receiver at `index`, shifting later entries
    /// down. Fails without touching the list when the index is out of
    /// bounds.
    pub fn remove_receiver(&mut self, index: usize) -> Result<String, ComposeError> {
        if index < self.receivers.len() {
            Ok(self.receivers.remove(index))
        } else {
            Err(ComposeError::IndexOutOfRange {
                index,
                len: self.receivers.len(),
            })
        }
    }

    /// Sets `server` and `port` to the fixed pair for a known provider.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.server = preset.server().to_owned();
        self.port = preset.port();
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Returns every field to its default, never a partial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Display for ComposeState {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        writeln!(fmt, "Username:    {}", self.username)?;
        writeln!(
            fmt,
            "Password:    {}",
            if self.password.is_empty() {
                "(unset)"
            } else {
                "********"
            }
        )?;
        writeln!(fmt, "Server:      {}", self.server)?;
        writeln!(fmt, "Port:        {}", self.port)?;
        writeln!(fmt, "Subject:     {}", self.subject)?;
        writeln!(fmt, "Receivers:")?;
        for (index, receiver) in self.receivers.iter().enumerate() {
            writeln!(fmt, "  [{index}] {receiver}")?;
        }
        writeln!(fmt, "Body:        {} byte(s)", self.body.len())?;
        writeln!(fmt, "HTML:        {} byte(s)", self.html.len())?;
        writeln!(fmt, "Attachments:")?;
        for (index, attachment) in self.attachments.iter().enumerate() {
            writeln!(
                fmt,
                "  [{index}] {} ({}, {} byte(s))",
                attachment.filename,
                attachment.media_type(),
                attachment.content.len()
            )?;
        }

        Ok(())
    }
}

/// Fixed server/port pairs for the common providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Gmail,
    Outlook,
    Yahoo,
}

impl Preset {
    #[must_use]
    pub const fn server(self) -> &'static str {
        match self {
            Self::Gmail => "smtp.gmail.com",
            Self::Outlook => "smtp-mail.outlook.com",
            Self::Yahoo => "smtp.mail.yahoo.com",
        }
    }

    #[must_use]
    pub const fn port(self) -> u16 {
        match self {
            Self::Gmail | Self::Yahoo => 465,
            Self::Outlook => 587,
        }
    }
}

impl FromStr for Preset {
    type Err = ComposeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "gmail" => Ok(Self::Gmail),
            "outlook" => Ok(Self::Outlook),
            "yahoo" => Ok(Self::Yahoo),
            other => Err(ComposeError::UnknownPreset(other.to_owned())),
        }
    }
}

/// One file's bytes plus the media type and name it will carry in the
/// outgoing message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub content: Vec<u8>,
    pub main_type: String,
    /// `None` when an image's format could not be determined from its
    /// content. Such attachments are still kept and fall back to
    /// `application/octet-stream` at send time.
    pub sub_type: Option<String>,
    pub filename: String,
}

impl Attachment {
    /// An image attachment, with the subtype sniffed from the content.
    #[must_use]
    pub fn image(content: Vec<u8>, filename: impl Into<String>) -> Self {
        let sub_type = sniff::image_subtype(&content).map(str::to_owned);

        Self {
            content,
            main_type: "image".to_owned(),
            sub_type,
            filename: filename.into(),
        }
    }

    /// A generic document attachment, always `application/octet-stream`
    /// regardless of content.
    #[must_use]
    pub fn document(content: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            content,
            main_type: "application".to_owned(),
            sub_type: Some("octet-stream".to_owned()),
            filename: filename.into(),
        }
    }

    /// The full media type for the outgoing part.
    #[must_use]
    pub fn media_type(&self) -> String {
        self.sub_type.as_ref().map_or_else(
            || "application/octet-stream".to_owned(),
            |sub| format!("{}/{sub}", self.main_type),
        )
    }
}

/// Accumulates a multi-line body until the [`BODY_TERMINATOR`] sentinel.
///
/// Every captured line is appended preceded by a newline, so a non-empty
/// body starts with one. That artifact is kept on purpose: documents written
/// by earlier versions of this tool round-trip byte for byte.
///
/// The capture buffers privately and only reaches the state through
/// [`ComposeState::set_body`], so an abandoned capture leaves the body as it
/// was.
#[derive(Debug, Default)]
pub struct BodyCapture {
    buffer: String,
}

impl BodyCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line. Returns `true` when the line was the terminator, at
    /// which point the capture is complete and the line is not recorded.
    pub fn push(&mut self, line: &str) -> bool {
        if line == BODY_TERMINATOR {
            true
        } else {
            self.buffer.push('\n');
            self.buffer.push_str(line);
            false
        }
    }

    /// The accumulated body.
    #[must_use]
    pub fn finish(self) -> String {
        self.buffer
    }
}
