//! The shell's command surface: one verb per line, parsed before dispatch.

use core::fmt::{self, Display, Formatter};

/// One parsed input line.
///
/// Verbs that need further values (`pass`, `cred`, `body`, the attachment
/// and persistence paths) carry nothing here; the shell prompts for those
/// after dispatch. Verbs with inline arguments carry them parsed.
#[derive(Eq, PartialEq, Debug)]
pub enum Command {
    User(String),
    Pass,
    Server(String),
    /// The preset name is validated when applied, not here, so an unknown
    /// provider is reported with the session's own error and not as a parse
    /// failure.
    Setup(String),
    Port(u16),
    Recv(String),
    Pop(usize),
    Cred,
    Subj(String),
    Body,
    Info,
    Img,
    Doc,
    Html,
    Reset,
    Login,
    Send,
    Save,
    Load,
    About,
    Clear,
    Exit,
    Invalid(String),
}

impl Display for Command {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(arg) => fmt.write_fmt(format_args!("user {arg}")),
            Self::Server(arg) => fmt.write_fmt(format_args!("server {arg}")),
            Self::Setup(arg) => fmt.write_fmt(format_args!("setup {arg}")),
            Self::Port(port) => fmt.write_fmt(format_args!("port {port}")),
            Self::Recv(addr) => fmt.write_fmt(format_args!("recv {addr}")),
            Self::Pop(index) => fmt.write_fmt(format_args!("recv pop {index}")),
            Self::Subj(arg) => fmt.write_fmt(format_args!("subj {arg}")),
            Self::Pass => fmt.write_str("pass"),
            Self::Cred => fmt.write_str("cred"),
            Self::Body => fmt.write_str("body"),
            Self::Info => fmt.write_str("info"),
            Self::Img => fmt.write_str("img"),
            Self::Doc => fmt.write_str("doc"),
            Self::Html => fmt.write_str("html"),
            Self::Reset => fmt.write_str("reset"),
            Self::Login => fmt.write_str("login"),
            Self::Send => fmt.write_str("send"),
            Self::Save => fmt.write_str("save"),
            Self::Load => fmt.write_str("load"),
            Self::About => fmt.write_str("about"),
            Self::Clear => fmt.write_str("clear"),
            Self::Exit => fmt.write_str("exit"),
            Self::Invalid(line) => fmt.write_str(line),
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = Self;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        // Verbs are matched exactly: the shell is lowercase, like its input.
        match verb {
            "user" => Ok(Self::User(rest.to_owned())),
            "pass" => Ok(Self::Pass),
            "server" => Ok(Self::Server(rest.to_owned())),
            "setup" => Ok(Self::Setup(rest.to_owned())),
            "port" => match rest.parse::<u16>() {
                Ok(port) if port > 0 => Ok(Self::Port(port)),
                _ => Err(Self::Invalid(format!(
                    "port requires a number between 1 and 65535, got '{rest}'"
                ))),
            },
            "recv" => {
                let mut words = rest.split_whitespace();
                match words.next() {
                    None => Err(Self::Invalid("recv requires an address".to_owned())),
                    Some("pop") => match words.next().map(str::parse::<usize>) {
                        Some(Ok(index)) => Ok(Self::Pop(index)),
                        _ => Err(Self::Invalid(format!(
                            "recv pop requires a position, got '{rest}'"
                        ))),
                    },
                    Some(_) => Ok(Self::Recv(rest.to_owned())),
                }
            }
            "cred" => Ok(Self::Cred),
            "subj" => Ok(Self::Subj(rest.to_owned())),
            "body" => Ok(Self::Body),
            "info" => Ok(Self::Info),
            "img" => Ok(Self::Img),
            "doc" => Ok(Self::Doc),
            "html" => Ok(Self::Html),
            "reset" => Ok(Self::Reset),
            "login" => Ok(Self::Login),
            "send" => Ok(Self::Send),
            "save" => Ok(Self::Save),
            "load" => Ok(Self::Load),
            "about" => Ok(Self::About),
            "clear" => Ok(Self::Clear),
            "exit" => Ok(Self::Exit),
            _ => Err(Self::Invalid(format!("Unknown command '{verb}'"))),
        }
    }
}

impl TryFrom<String> for Command {
    type Error = Self;

    fn try_from(line: String) -> Result<Self, Self::Error> {
        Self::try_from(line.as_str())
    }
}
