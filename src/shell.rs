//! The interactive command loop.
//!
//! The shell owns the session's [`ComposeState`] and is the only layer that
//! talks to the terminal or the filesystem: it prompts for values, reads
//! attachment files, and hands already-read bytes and strings to the state
//! operations. A failed command is reported and the loop carries on; only
//! `exit` (or end of input) ends the session.
//!
//! Reader and writer are generic so whole sessions can be scripted in tests.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    compose::{Attachment, BodyCapture, Command, ComposeError, ComposeState, Preset},
    internal, persist,
    transport::{self, SendError},
};

const PROMPT: &str = ">>> ";
const INTRO: &str = "Welcome to missive. Type 'about' for an overview, 'exit' to leave.";
const CLEAR: &str = "\x1b[2J\x1b[1;1H";

const ABOUT: &str = "\
missive composes and sends one email at a time from an interactive shell.

Configure the account with 'user', 'pass' (or both at once with 'cred'),
and pick the server either directly ('server', 'port') or with a provider
preset ('setup gmail', 'setup outlook', 'setup yahoo').

Compose with 'recv <address>' (repeat to add more, 'recv pop <index>' to
remove one), 'subj', and 'body' (finish the text with a line reading 'end').
'img' and 'doc' attach files, 'html' sets an HTML rendering of the body.

'info' shows everything entered so far, 'reset' starts over, 'login' checks
the credentials without sending, and 'send' submits the message over TLS.
'save' and 'load' persist the session to and from a JSON file.";

/// Any failure a single command can produce. Reported at the command
/// boundary, never fatal to the session.
#[derive(Debug, Error)]
enum ShellError {
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Send(#[from] SendError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

enum Flow {
    Continue,
    Exit,
}

/// One interactive session over a line-oriented reader and a writer.
pub struct Shell<Input, Output> {
    state: ComposeState,
    input: Input,
    output: Output,
}

impl<Input: BufRead, Output: Write> Shell<Input, Output> {
    pub fn new(input: Input, output: Output) -> Self {
        Self::with_state(ComposeState::default(), input, output)
    }

    /// A shell resuming from previously entered (e.g. restored) state.
    pub fn with_state(state: ComposeState, input: Input, output: Output) -> Self {
        Self {
            state,
            input,
            output,
        }
    }

    pub const fn state(&self) -> &ComposeState {
        &self.state
    }

    pub fn into_state(self) -> ComposeState {
        self.state
    }

    /// Runs the command loop until `exit` or end of input.
    ///
    /// Only terminal I/O failures propagate; every command failure is
    /// printed and the loop continues.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{INTRO}")?;

        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match Command::try_from(line) {
                Ok(command) => command,
                Err(invalid) => {
                    writeln!(self.output, "{invalid}")?;
                    continue;
                }
            };

            internal!("dispatching '{}'", command);

            match self.execute(command) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(err) => {
                    internal!(level = WARN, "{err}");
                    writeln!(self.output, "{err}")?;
                }
            }
        }

        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<Flow, ShellError> {
        match command {
            Command::User(username) => self.state.set_username(&username),
            Command::Pass => {
                let password = self.prompt("Password: ")?;
                self.state.set_password(&password);
            }
            Command::Cred => {
                let username = self.prompt("Username: ")?;
                let password = self.prompt("Password: ")?;
                self.state.set_credentials(&username, &password);
            }
            Command::Server(server) => self.state.set_server(&server),
            Command::Setup(name) => {
                self.state.apply_preset(name.parse::<Preset>()?);
                writeln!(
                    self.output,
                    "Using {}:{}",
                    self.state.server, self.state.port
                )?;
            }
            Command::Port(port) => self.state.set_port(port),
            Command::Recv(address) => self.state.add_receiver(&address),
            Command::Pop(index) => {
                let removed = self.state.remove_receiver(index)?;
                writeln!(self.output, "Removed {removed}")?;
            }
            Command::Subj(subject) => self.state.set_subject(&subject),
            Command::Body => {
                let mut capture = BodyCapture::new();
                loop {
                    let line = self.prompt("> ")?;
                    if capture.push(&line) {
                        break;
                    }
                }
                self.state.set_body(capture.finish());
            }
            Command::Info => write!(self.output, "{}", self.state)?,
            Command::Img => {
                let path = PathBuf::from(self.prompt("Path to image: ")?.trim());
                let content = fs::read(&path).map_err(ComposeError::Io)?;
                self.state.attach(Attachment::image(content, filename_of(&path)));
                writeln!(self.output, "Image attached.")?;
            }
            Command::Doc => {
                let path = PathBuf::from(self.prompt("Path to document: ")?.trim());
                let content = fs::read(&path).map_err(ComposeError::Io)?;
                self.state
                    .attach(Attachment::document(content, filename_of(&path)));
                writeln!(self.output, "Document attached.")?;
            }
            Command::Html => {
                let path = self.prompt("Path to HTML: ")?;
                let content =
                    fs::read_to_string(path.trim()).map_err(ComposeError::Io)?;
                self.state.set_html(content);
                writeln!(self.output, "HTML content set.")?;
            }
            Command::Reset => {
                self.state.reset();
                write!(self.output, "{CLEAR}")?;
            }
            Command::Login => {
                writeln!(self.output, "Attempting to login...")?;
                transport::login(&self.state)?;
                writeln!(self.output, "Login successful, credentials are fine.")?;
            }
            Command::Send => {
                writeln!(self.output, "Logging in...")?;
                transport::send(&self.state)?;
                writeln!(self.output, "Message sent successfully.")?;
            }
            Command::Save => {
                let path = PathBuf::from(self.prompt("JSON file path: ")?.trim());
                persist::save_file(&self.state, &path)?;
                writeln!(self.output, "Session saved.")?;
            }
            Command::Load => {
                let path = PathBuf::from(self.prompt("JSON file path: ")?.trim());
                self.state = persist::load_file(&path)?;
                writeln!(self.output, "Session restored.")?;
            }
            Command::About => writeln!(self.output, "{ABOUT}")?,
            Command::Clear => write!(self.output, "{CLEAR}")?,
            Command::Exit => return Ok(Flow::Exit),
            Command::Invalid(message) => writeln!(self.output, "{message}")?,
        }

        Ok(Flow::Continue)
    }

    /// Prompts for one further value on its own line. Only the line ending
    /// is stripped, so values may carry meaningful inner whitespace.
    fn prompt(&mut self, prompt: &str) -> Result<String, ShellError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended during a prompt",
            )));
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

fn filename_of(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
