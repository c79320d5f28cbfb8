//! Saving and restoring session state as a JSON document.
//!
//! The document holds exactly nine keys, written in lexicographic order with
//! stable indentation so saved sessions diff cleanly. Attachment content is
//! base64 so binary survives the textual format. Loading replaces the whole
//! state; it never merges into the current one, and a missing key or a value
//! of the wrong shape is an error.

use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::{
    compose::{Attachment, ComposeError, ComposeState},
    internal,
};

/// The wire shape of a saved session.
///
/// Field order is the serialization order, so these are declared sorted.
/// `receiver` stays singular and attachments stay positional 4-tuples for
/// compatibility with documents written by earlier versions of this tool.
#[derive(Debug, Serialize, Deserialize)]
struct Document {
    attachments: Vec<(String, String, Option<String>, String)>,
    body: String,
    html: String,
    password: String,
    port: u16,
    receiver: Vec<String>,
    server: String,
    subject: String,
    username: String,
}

impl From<&ComposeState> for Document {
    fn from(state: &ComposeState) -> Self {
        Self {
            attachments: state
                .attachments
                .iter()
                .map(|attachment| {
                    (
                        BASE64.encode(&attachment.content),
                        attachment.main_type.clone(),
                        attachment.sub_type.clone(),
                        attachment.filename.clone(),
                    )
                })
                .collect(),
            body: state.body.clone(),
            html: state.html.clone(),
            password: state.password.clone(),
            port: state.port,
            receiver: state.receivers.clone(),
            server: state.server.clone(),
            subject: state.subject.clone(),
            username: state.username.clone(),
        }
    }
}

impl TryFrom<Document> for ComposeState {
    type Error = ComposeError;

    fn try_from(document: Document) -> Result<Self, Self::Error> {
        let attachments = document
            .attachments
            .into_iter()
            .map(|(content, main_type, sub_type, filename)| {
                let content = BASE64.decode(content).map_err(|err| {
                    ComposeError::MalformedDocument(format!(
                        "attachment '{filename}' content is not valid base64: {err}"
                    ))
                })?;

                Ok(Attachment {
                    content,
                    main_type,
                    sub_type,
                    filename,
                })
            })
            .collect::<Result<Vec<_>, ComposeError>>()?;

        Ok(Self {
            username: document.username,
            password: document.password,
            server: document.server,
            port: document.port,
            receivers: document.receiver,
            subject: document.subject,
            body: document.body,
            html: document.html,
            attachments,
        })
    }
}

/// Serializes the state to the pretty-printed session document.
pub fn to_json(state: &ComposeState) -> Result<String, ComposeError> {
    Ok(serde_json::to_string_pretty(&Document::from(state))?)
}

/// Parses a session document into a complete replacement state.
pub fn from_json(document: &str) -> Result<ComposeState, ComposeError> {
    serde_json::from_str::<Document>(document)?.try_into()
}

/// Writes the session document to `path`, creating or truncating it.
pub fn save_file(state: &ComposeState, path: &Path) -> Result<(), ComposeError> {
    if !state.password.is_empty() {
        internal!(
            level = WARN,
            "session password is stored in cleartext in {}",
            path.display()
        );
    }

    fs::write(path, to_json(state)?)?;
    internal!(level = INFO, "session saved to {}", path.display());

    Ok(())
}

/// Reads the session document at `path`.
pub fn load_file(path: &Path) -> Result<ComposeState, ComposeError> {
    let state = from_json(&fs::read_to_string(path)?)?;
    internal!(level = INFO, "session restored from {}", path.display());

    Ok(state)
}
