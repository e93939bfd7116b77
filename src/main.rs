use std::sync::Arc;

use signin::config::AppConfig;
use signin::{CredentialRules, LoginForm, console};
use tokio::io::{AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    let authenticator = match config.auth.build() {
        Ok(authenticator) => authenticator,
        Err(e) => {
            tracing::error!(error = %e, "authenticator init failed");
            std::process::exit(2);
        }
    };

    let form = LoginForm::new(authenticator, Arc::new(CredentialRules), &config.form);

    // Print every state change, like a view re-rendering on publish. The
    // loop ends once the form is dropped and its last snapshot is printed.
    let mut updates = form.subscribe();
    let renderer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while updates.changed().await.is_ok() {
            let line = format!("{}\n", console::render(&updates.borrow_and_update()));
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    tracing::info!(form_id = %form.id(), "signin console ready");
    let mut stdout = tokio::io::stdout();
    if let Err(e) = console::run(&form, BufReader::new(tokio::io::stdin()), &mut stdout).await {
        tracing::error!(error = %e, "console I/O failed");
    }

    drop(form);
    match renderer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "render output failed"),
        Err(e) => tracing::error!(error = %e, "renderer task failed"),
    }
}
