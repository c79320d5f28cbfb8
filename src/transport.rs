//! Message assembly and SMTP submission.
//!
//! The session state is turned into a single MIME message and handed to
//! lettre's blocking SMTP transport. The transport is created, used once,
//! and dropped, so the connection is released on every path. There is no
//! retry: a failed submission leaves the session state exactly as it was.

use lettre::{
    message::{header::ContentType, Attachment as AttachmentPart, Body, Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Message, SmtpTransport, Transport,
};
use thiserror::Error;

use crate::{compose::ComposeState, outgoing};

/// Ports at or below this speak TLS from the first byte; everything else is
/// plaintext upgraded via mandatory STARTTLS.
const SMTPS_PORT: u16 = 465;

/// Failures while connecting, authenticating, or submitting.
#[derive(Debug, Error)]
pub enum SendError {
    /// TLS configuration for the target server could not be built.
    #[error("Unable to establish a secure session: {0}")]
    Tls(#[source] lettre::transport::smtp::Error),

    /// The server rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] lettre::transport::smtp::Error),

    /// The server could not be reached or dropped the session.
    #[error("Connection failed: {0}")]
    Connection(#[source] lettre::transport::smtp::Error),

    /// The server accepted the session but refused the message.
    #[error("The server did not accept the message: {0}")]
    Transport(#[source] lettre::transport::smtp::Error),

    /// The connection check completed but the server was not usable.
    #[error("Server {0} did not respond to the connection check")]
    Unresponsive(String),

    /// A sender or receiver could not be read as a mailbox address.
    #[error("Invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// An attachment's declared media type was not a valid header value.
    #[error("Invalid media type '{media_type}' on attachment '{filename}'")]
    MediaType { media_type: String, filename: String },

    /// The message itself could not be assembled, e.g. no receivers.
    #[error("Unable to assemble the message: {0}")]
    Message(#[from] lettre::error::Error),
}

fn mailer(state: &ComposeState) -> Result<SmtpTransport, SendError> {
    let parameters = TlsParameters::new(state.server.clone()).map_err(SendError::Tls)?;
    let tls = if state.port == SMTPS_PORT {
        Tls::Wrapper(parameters)
    } else {
        Tls::Required(parameters)
    };

    Ok(SmtpTransport::builder_dangerous(state.server.as_str())
        .port(state.port)
        .tls(tls)
        .credentials(Credentials::new(
            state.username.clone(),
            state.password.clone(),
        ))
        .build())
}

/// Opens an encrypted session to `server:port`, authenticates, and closes
/// it again. Proves the credentials without sending anything.
pub fn login(state: &ComposeState) -> Result<(), SendError> {
    outgoing!(
        level = INFO,
        "verifying credentials for {} against {}:{}",
        state.username,
        state.server,
        state.port
    );

    match mailer(state)?.test_connection() {
        Ok(true) => Ok(()),
        Ok(false) => Err(SendError::Unresponsive(state.server.clone())),
        Err(err) if err.is_permanent() => Err(SendError::Authentication(err)),
        Err(err) => Err(SendError::Connection(err)),
    }
}

/// Builds the outgoing message from the session state.
///
/// The message is multipart/mixed: the body first, then every attachment in
/// insertion order. When HTML content is present the body is a
/// multipart/alternative of the plain text and the HTML; when it is empty
/// the plain text stands alone and no degenerate alternative is emitted.
pub fn build_message(state: &ComposeState) -> Result<Message, SendError> {
    let mut builder = Message::builder()
        .from(state.username.parse::<Mailbox>()?)
        .subject(state.subject.clone());

    for receiver in &state.receivers {
        builder = builder.to(receiver.parse::<Mailbox>()?);
    }

    let mut parts = if state.html.is_empty() {
        MultiPart::mixed().singlepart(lettre::message::SinglePart::plain(state.body.clone()))
    } else {
        MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
            state.body.clone(),
            state.html.clone(),
        ))
    };

    for attachment in &state.attachments {
        let media_type = attachment.media_type();
        let content_type =
            ContentType::parse(&media_type).map_err(|_| SendError::MediaType {
                media_type,
                filename: attachment.filename.clone(),
            })?;

        parts = parts.singlepart(
            AttachmentPart::new(attachment.filename.clone())
                .body(Body::new(attachment.content.clone()), content_type),
        );
    }

    Ok(builder.multipart(parts)?)
}

/// Builds the message and submits it over a fresh transport session.
pub fn send(state: &ComposeState) -> Result<(), SendError> {
    let message = build_message(state)?;

    outgoing!(
        level = INFO,
        "submitting message to {} receiver(s) via {}:{}",
        state.receivers.len(),
        state.server,
        state.port
    );

    match mailer(state)?.send(&message) {
        Ok(response) => {
            outgoing!(level = INFO, "server accepted with code {}", response.code());
            Ok(())
        }
        Err(err) if err.is_permanent() => Err(SendError::Transport(err)),
        Err(err) => Err(SendError::Connection(err)),
    }
}
