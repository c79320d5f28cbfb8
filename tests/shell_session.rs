//! Scripted end-to-end shell sessions.
//!
//! Each test drives a whole session through the shell's reader/writer
//! interface: the script is what a user would type, and assertions look at
//! the resulting state and the conversation output.

use missive::{
    compose::{ComposeState, Preset},
    shell::Shell,
};
use pretty_assertions::assert_eq;

fn run_session(script: &str) -> (ComposeState, String) {
    let mut output = Vec::new();
    let mut shell = Shell::new(script.as_bytes(), &mut output);
    shell.run().expect("session should run to completion");

    let state = shell.into_state();
    (state, String::from_utf8(output).expect("output should be UTF-8"))
}

#[test]
fn compose_scenario() {
    let script = "\
user me@example.com
subj weekly numbers
recv x@y.com
recv z@y.com
recv pop 0
setup outlook
body
first line
second line
end
exit
";

    let (state, output) = run_session(script);

    assert_eq!(state.username, "me@example.com");
    assert_eq!(state.subject, "weekly numbers");
    assert_eq!(state.receivers, ["z@y.com"]);
    assert_eq!(state.server, "smtp-mail.outlook.com");
    assert_eq!(state.port, 587);
    assert_eq!(state.body, "\nfirst line\nsecond line");
    assert!(output.contains("Removed x@y.com"));
    assert!(output.contains("Using smtp-mail.outlook.com:587"));
}

#[test]
fn session_survives_unknown_commands() {
    let (state, output) = run_session("frobnicate\nuser me@example.com\nexit\n");

    assert_eq!(state.username, "me@example.com");
    assert!(output.contains("Unknown command 'frobnicate'"));
}

#[test]
fn out_of_range_pop_reports_and_preserves() {
    let (state, output) = run_session("recv only@y.com\nrecv pop 5\nexit\n");

    assert_eq!(state.receivers, ["only@y.com"]);
    assert!(output.contains("out of range"));
}

#[test]
fn unknown_preset_reports_and_preserves() {
    let (state, output) = run_session("setup aol\nexit\n");

    assert_eq!(state.server, "smtp.gmail.com");
    assert_eq!(state.port, 465);
    assert!(output.contains("Unrecognized preset 'aol'"));
}

#[test]
fn preset_restores_gmail_after_override() {
    let (state, _) = run_session("server mail.example.com\nport 2525\nsetup gmail\nexit\n");

    assert_eq!(state.server, Preset::Gmail.server());
    assert_eq!(state.port, Preset::Gmail.port());
}

#[test]
fn pass_and_cred_prompt_for_values() {
    let (state, output) = run_session("pass\nhunter2\nexit\n");
    assert_eq!(state.password, "hunter2");
    assert!(output.contains("Password: "));

    let (state, output) = run_session("cred\nme@example.com\nswordfish\nexit\n");
    assert_eq!(state.username, "me@example.com");
    assert_eq!(state.password, "swordfish");
    assert!(output.contains("Username: "));
}

#[test]
fn info_redacts_the_password() {
    let (_, output) = run_session("pass\nhunter2\ninfo\nexit\n");

    assert!(output.contains("********"));
    assert!(!output.contains("Password:    hunter2"));
}

#[test]
fn reset_returns_to_defaults() {
    let script = "\
user me@example.com
recv x@y.com
port 587
reset
exit
";

    let (state, _) = run_session(script);
    assert_eq!(state, ComposeState::default());
}

#[test]
fn end_of_input_closes_the_session() {
    // No explicit exit: the script just runs out
    let (state, _) = run_session("user me@example.com\n");
    assert_eq!(state.username, "me@example.com");
}

#[test]
fn attachments_are_read_and_sniffed() {
    let dir = tempfile::tempdir().unwrap();

    let image = dir.path().join("pixel.png");
    std::fs::write(&image, b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR").unwrap();

    let document = dir.path().join("notes.bin");
    std::fs::write(&document, [0u8, 1, 2, 3]).unwrap();

    let script = format!(
        "img\n{}\ndoc\n{}\nexit\n",
        image.display(),
        document.display()
    );
    let (state, output) = run_session(&script);

    assert_eq!(state.attachments.len(), 2);
    assert_eq!(state.attachments[0].filename, "pixel.png");
    assert_eq!(state.attachments[0].media_type(), "image/png");
    assert_eq!(state.attachments[1].filename, "notes.bin");
    assert_eq!(state.attachments[1].media_type(), "application/octet-stream");
    assert!(output.contains("Image attached."));
    assert!(output.contains("Document attached."));
}

#[test]
fn missing_attachment_file_reports_and_continues() {
    let (state, output) = run_session("img\n/no/such/file.png\nuser me@example.com\nexit\n");

    assert!(state.attachments.is_empty());
    assert_eq!(state.username, "me@example.com");
    assert!(output.contains("I/O error"));
}

#[test]
fn html_command_reads_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("body.html");
    std::fs::write(&page, "<h1>hello</h1>").unwrap();

    let script = format!("html\n{}\nexit\n", page.display());
    let (state, _) = run_session(&script);

    assert_eq!(state.html, "<h1>hello</h1>");
}

#[test]
fn save_reset_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");

    let script = format!(
        "\
user me@example.com
subj numbers
recv a@y.com
recv b@y.com
setup yahoo
save
{path}
reset
load
{path}
exit
",
        path = session.display()
    );

    let (state, output) = run_session(&script);

    assert_eq!(state.username, "me@example.com");
    assert_eq!(state.subject, "numbers");
    assert_eq!(state.receivers, ["a@y.com", "b@y.com"]);
    assert_eq!(state.server, "smtp.mail.yahoo.com");
    assert_eq!(state.port, 465);
    assert!(output.contains("Session saved."));
    assert!(output.contains("Session restored."));
}

#[test]
fn load_replaces_rather_than_merges() {
    let dir = tempfile::tempdir().unwrap();
    let session = dir.path().join("session.json");

    // Save a session holding only a subject, then build up unrelated state
    // and load the document over it.
    let script = format!(
        "subj original\nsave\n{path}\nreset\nuser someone@else.com\nrecv extra@y.com\nload\n{path}\nexit\n",
        path = session.display()
    );

    let (state, _) = run_session(&script);

    assert_eq!(state.subject, "original");
    assert!(state.username.is_empty(), "load must not merge fields");
    assert!(state.receivers.is_empty(), "load must not merge receivers");
}

#[test]
fn load_failure_leaves_state_untouched() {
    let (state, output) =
        run_session("user me@example.com\nload\n/no/such/session.json\nexit\n");

    assert_eq!(state.username, "me@example.com");
    assert!(output.contains("I/O error"));
}
