//! Line-oriented console driver for the login form.
//!
//! DESIGN
//! ======
//! The console is a stand-in presentation layer. It turns stdin lines into
//! form operations and prints snapshots as JSON, one per line. `submit` runs
//! in a background task so edits keep flowing while a login is pending;
//! outstanding submissions are awaited before `run` returns.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::form::{Field, FieldSnapshot, FormSnapshot, LoginForm, SubmitOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Submit,
    Logout,
    Reset,
    Clear,
    Show,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} takes no argument")]
    UnexpectedArgument(&'static str),
}

/// Parse one input line.
///
/// `identifier` and `secret` take the rest of the line verbatim, so leading
/// and inner spaces reach the form untouched. A bare `identifier` sets an
/// empty value.
///
/// # Errors
///
/// Returns a [`CommandError`] for blank lines, unknown verbs, or arguments
/// passed to verbs that take none.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (verb, arg) = match line.split_once(' ') {
        Some((verb, arg)) => (verb, Some(arg)),
        None => (line, None),
    };

    let bare = |cmd: Command, name: &'static str| match arg {
        Some(a) if !a.trim().is_empty() => Err(CommandError::UnexpectedArgument(name)),
        _ => Ok(cmd),
    };

    match verb {
        "" => Err(CommandError::Empty),
        "identifier" => Ok(Command::Set(Field::Identifier, arg.unwrap_or_default().to_owned())),
        "secret" => Ok(Command::Set(Field::Secret, arg.unwrap_or_default().to_owned())),
        "submit" => bare(Command::Submit, "submit"),
        "logout" => bare(Command::Logout, "logout"),
        "reset" => bare(Command::Reset, "reset"),
        "clear" => bare(Command::Clear, "clear"),
        "show" => bare(Command::Show, "show"),
        "quit" | "exit" => bare(Command::Quit, "quit"),
        other => Err(CommandError::Unknown(other.to_owned())),
    }
}

/// Copy of `snapshot` with the secret replaced by asterisks.
#[must_use]
pub fn masked(snapshot: &FormSnapshot) -> FormSnapshot {
    let mask = |s: &str| "*".repeat(s.chars().count());
    FormSnapshot {
        secret: FieldSnapshot {
            value: mask(&snapshot.secret.value),
            error: snapshot.secret.error.clone(),
            last_validated_value: snapshot.secret.last_validated_value.as_deref().map(mask),
        },
        ..snapshot.clone()
    }
}

/// Render a snapshot as a single JSON line with the secret masked.
#[must_use]
pub fn render(snapshot: &FormSnapshot) -> String {
    serde_json::to_string(&masked(snapshot)).unwrap_or_else(|e| format!("{{\"render_error\":\"{e}\"}}"))
}

/// Drive `form` from `input` until EOF or `quit`.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub async fn run<R, W>(form: &LoginForm, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut submissions: Vec<JoinHandle<SubmitOutcome>> = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                warn!(error = %e, "ignoring input line");
                continue;
            }
        };

        match command {
            Command::Set(field, value) => form.set_field_value(field, value),
            Command::Submit => {
                let form = form.clone();
                submissions.push(tokio::spawn(async move { form.submit().await }));
            }
            Command::Logout => form.logout(),
            Command::Reset => form.reset(),
            Command::Clear => form.clear_errors(),
            Command::Show => {
                out.write_all(render(&form.snapshot()).as_bytes()).await?;
                out.write_all(b"\n").await?;
            }
            Command::Quit => break,
        }
    }

    for submission in submissions {
        match submission.await {
            Ok(outcome) => info!(?outcome, "submission finished"),
            Err(e) => warn!(error = %e, "submission task failed"),
        }
    }
    out.flush().await
}

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;
