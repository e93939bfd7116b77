use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::auth::AuthOutcome;
use crate::auth::test_helpers::ScriptedAuthenticator;
use crate::config::FormConfig;
use crate::form::Phase;
use crate::validation::CredentialRules;

fn console_form(auth: &Arc<ScriptedAuthenticator>) -> LoginForm {
    LoginForm::new(auth.clone(), Arc::new(CredentialRules), &FormConfig { debounce: Duration::from_millis(500) })
}

// =============================================================================
// parse_command
// =============================================================================

#[test]
fn parses_field_setters_verbatim() {
    assert_eq!(
        parse_command("identifier test@example.com"),
        Ok(Command::Set(Field::Identifier, "test@example.com".into()))
    );
    assert_eq!(parse_command("secret  Pass word1"), Ok(Command::Set(Field::Secret, " Pass word1".into())));
    assert_eq!(parse_command("identifier"), Ok(Command::Set(Field::Identifier, String::new())));
    assert_eq!(parse_command("secret Password123\r\n"), Ok(Command::Set(Field::Secret, "Password123".into())));
}

#[test]
fn parses_bare_verbs() {
    assert_eq!(parse_command("submit"), Ok(Command::Submit));
    assert_eq!(parse_command("logout"), Ok(Command::Logout));
    assert_eq!(parse_command("reset"), Ok(Command::Reset));
    assert_eq!(parse_command("clear"), Ok(Command::Clear));
    assert_eq!(parse_command("show "), Ok(Command::Show));
    assert_eq!(parse_command("exit"), Ok(Command::Quit));
}

#[test]
fn rejects_bad_lines() {
    assert_eq!(parse_command(""), Err(CommandError::Empty));
    assert_eq!(parse_command("login now"), Err(CommandError::Unknown("login".into())));
    assert_eq!(parse_command("submit twice"), Err(CommandError::UnexpectedArgument("submit")));
}

// =============================================================================
// render
// =============================================================================

#[test]
fn render_masks_secret() {
    let mut snapshot = FormSnapshot::default();
    snapshot.identifier.value = "test@example.com".into();
    snapshot.secret.value = "Password123".into();
    snapshot.secret.last_validated_value = Some("Pass".into());

    let line = render(&snapshot);
    assert!(line.contains("test@example.com"));
    assert!(!line.contains("Password123"));
    assert!(line.contains("\"***********\""));
    assert!(line.contains("\"****\""));

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["phase"]["state"], "idle");
    assert_eq!(value["is_submitting"], false);
}

// =============================================================================
// run
// =============================================================================

#[tokio::test]
async fn run_drives_a_full_login() {
    let auth = Arc::new(ScriptedAuthenticator::new(vec![AuthOutcome::Success]));
    let form = console_form(&auth);
    let input: &[u8] = b"identifier test@example.com\nsecret Password123\nsubmit\n";
    let mut out = Vec::new();

    run(&form, input, &mut out).await.unwrap();

    assert_eq!(auth.logins(), 1);
    assert!(form.is_authenticated());
    assert_eq!(form.phase(), Phase::Succeeded);
}

#[tokio::test]
async fn run_prints_show_and_stops_at_quit() {
    let auth = Arc::new(ScriptedAuthenticator::new(vec![]));
    let form = console_form(&auth);
    let input: &[u8] = b"bogus\n\nidentifier a@b.co\nshow\nquit\nsubmit\n";
    let mut out = Vec::new();

    run(&form, input, &mut out).await.unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed.lines().count(), 1);
    assert!(printed.contains("a@b.co"));
    assert_eq!(auth.logins(), 0);
}

#[tokio::test]
async fn run_logout_resets_form() {
    let auth = Arc::new(ScriptedAuthenticator::new(vec![]));
    let form = console_form(&auth);
    let input: &[u8] = b"identifier test@example.com\nsecret Password123\nlogout\n";
    let mut out = Vec::new();

    run(&form, input, &mut out).await.unwrap();

    assert_eq!(auth.logouts(), 1);
    assert_eq!(form.value(Field::Identifier), "");
    assert_eq!(form.value(Field::Secret), "");
}
