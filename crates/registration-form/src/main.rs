//! Terminal signup form - Entry point.

use anyhow::{Context, Result};
use registration_form::{
    view, Field, FormConfig, HttpRegistrationApi, Redirect, RegisterForm, SubmitOutcome,
};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = FormConfig::load().context("Failed to load configuration")?;

    init_logging(&config.log_level);

    let api = HttpRegistrationApi::new(&config.api_url, config.timeout)
        .context("Failed to create registration client")?;
    info!(endpoint = %api.endpoint(), "Registration form ready");

    let redirect = Redirect {
        target: config.login_url.clone(),
        after: config.redirect_delay,
    };
    let mut form = RegisterForm::new(api, redirect);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Vec<Field> = Field::ALL.to_vec();

    loop {
        println!("{}", view::render(&form));

        for field in &pending {
            match read_field(&mut lines, *field).await? {
                Some(value) => form.set_field(*field, value),
                None => return Ok(()),
            }
        }

        println!("Creating Account...");

        match form.submit().await {
            SubmitOutcome::Registered { username, redirect } => {
                println!("{}", view::render(&form));
                info!(%username, "Account created");
                tokio::time::sleep(redirect.after).await;
                println!("Continue at {}", redirect.target);
                return Ok(());
            }
            SubmitOutcome::Invalid => {
                pending = Field::ALL
                    .into_iter()
                    .filter(|f| form.errors().get(*f).is_some())
                    .collect();
            }
            SubmitOutcome::Failed(_) => {
                pending = Field::ALL.to_vec();
            }
        }
    }
}

/// Prompt for one field. `None` on end of input.
async fn read_field(lines: &mut Lines<BufReader<Stdin>>, field: Field) -> Result<Option<String>> {
    print!("{}", view::prompt(field));
    std::io::stdout().flush().context("Failed to write prompt")?;

    let line = lines.next_line().await.context("Failed to read input")?;
    Ok(line.map(|l| l.trim_end_matches(['\r', '\n']).to_string()))
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
