use std::{io, path::PathBuf};

use clap::Parser;

use missive::{compose::ComposeState, logging, persist, shell::Shell};

/// An interactive shell for composing and sending email.
#[derive(Parser)]
#[command(name = "missive", version, about)]
struct Args {
    /// Restore a previously saved session before the shell starts
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Override the initial SMTP server
    #[arg(long)]
    server: Option<String>,

    /// Override the initial SMTP port
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    logging::init();

    let args = Args::parse();

    let mut state = match &args.load {
        Some(path) => persist::load_file(path)?,
        None => ComposeState::default(),
    };

    if let Some(server) = &args.server {
        state.set_server(server);
    }
    if let Some(port) = args.port {
        state.set_port(port);
    }

    Shell::with_state(state, io::stdin().lock(), io::stdout().lock()).run()?;

    Ok(())
}
