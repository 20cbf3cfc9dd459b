use anyhow::Context;
use clap::{Parser, Subcommand};

use forsee_app::{App, AppConfig, Frame, Screen};
use forsee_auth::Role;

/// Forsee demo driven from the terminal. Every command prints the resulting
/// frame as JSON; the session persists between invocations, handoffs do not.
#[derive(Parser, Debug)]
#[command(name = "forsee", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the home view for the current session
    Status,
    /// Sign in with email and credential
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        credential: String,
        /// Protected path to visit first; sign-in resumes there
        #[arg(long)]
        next: Option<String>,
    },
    /// Create an account and sign it in
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        credential: String,
    },
    /// Sign in through the federated identity provider
    Federated,
    /// Clear the session
    SignOut,
    /// Commit a role (admin, engineer, viewer) or clear it
    Role {
        #[arg(required_unless_present = "clear")]
        role: Option<Role>,
        #[arg(long, conflicts_with = "role")]
        clear: bool,
    },
    /// Render an arbitrary path
    Open { path: String },
    /// Run a prediction for a system, overriding sensors with key=value pairs
    Predict {
        slug: String,
        #[arg(value_parser = parse_assignment)]
        sensors: Vec<(String, String)>,
    },
    /// List the supported systems
    Catalog,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected sensor=value, got '{raw}'")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    forsee_observability::init(config.log_format);

    tracing::debug!(storage = %config.storage_path.display(), "starting");
    let mut app = App::from_config(&config).context("failed to open session storage")?;

    let outcome = dispatch(&mut app, cli.command).await;

    // The frame is printed even when the action failed; its notices say why.
    print_frame(&app.render())?;
    outcome
}

async fn dispatch(app: &mut App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Status => {}
        Command::SignIn {
            email,
            credential,
            next,
        } => {
            app.open(next.as_deref().unwrap_or("/login"));
            app.render();
            app.sign_in(&email, &credential).await.context("sign-in failed")?;
        }
        Command::SignUp {
            name,
            email,
            credential,
        } => {
            app.open("/signup");
            app.sign_up(&name, &email, &credential)
                .await
                .context("sign-up failed")?;
        }
        Command::Federated => {
            app.open("/login");
            app.sign_in_with_federated_provider()
                .await
                .context("federated sign-in failed")?;
        }
        Command::SignOut => app.sign_out(),
        Command::Role { role, clear } => match role {
            Some(role) if !clear => {
                app.select_role(role);
                if app.confirm_role().is_none() {
                    anyhow::bail!(
                        "role not assigned: sign in first, or run `role --clear` to change it"
                    );
                }
            }
            _ => app.session().assign_role(None),
        },
        Command::Open { path } => app.open(&path),
        Command::Predict { slug, sensors } => predict(app, &slug, &sensors).await?,
        Command::Catalog => app.open("/systems"),
    }
    Ok(())
}

async fn predict(app: &mut App, slug: &str, sensors: &[(String, String)]) -> anyhow::Result<()> {
    app.open(&format!("/system/{slug}"));
    let frame = app.render();
    if !matches!(frame.screen, Screen::SystemInput { .. }) {
        anyhow::bail!("sign in before running a prediction");
    }

    for (sensor, value) in sensors {
        app.set_sensor(sensor, value)?;
    }
    app.run_prediction().await?;
    Ok(())
}

fn print_frame(frame: &Frame) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(frame).context("failed to encode frame")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use forsee_app::PredictionFlow;
    use forsee_auth::{DemoAuthenticator, MemoryStore, SessionConfig, SessionStore};

    use super::*;

    fn app() -> App {
        let session = SessionStore::open(
            Arc::new(MemoryStore::new()),
            Arc::new(DemoAuthenticator::new()),
            SessionConfig {
                auth_latency: Duration::ZERO,
            },
        );
        App::new(session, PredictionFlow::instant())
    }

    fn sign_in(email: &str) -> Command {
        Command::SignIn {
            email: email.into(),
            credential: "pw".into(),
            next: None,
        }
    }

    #[tokio::test]
    async fn failed_sign_in_fails_the_command() {
        let mut app = app();
        assert!(dispatch(&mut app, sign_in("")).await.is_err());

        let frame = app.render();
        assert_eq!(frame.path, "/login");
        assert_eq!(frame.notices.len(), 1);
    }

    #[tokio::test]
    async fn predict_needs_a_session_and_a_role() {
        let mut app = app();
        let predict = || Command::Predict {
            slug: "servers".into(),
            sensors: vec![("cpuTemp".into(), "40".into())],
        };
        assert!(dispatch(&mut app, predict()).await.is_err());

        dispatch(&mut app, sign_in("ada@forsee.ai")).await.unwrap();
        assert!(dispatch(&mut app, predict()).await.is_err());

        dispatch(
            &mut app,
            Command::Role {
                role: Some(Role::Engineer),
                clear: false,
            },
        )
        .await
        .unwrap();
        dispatch(&mut app, predict()).await.unwrap();
        assert_eq!(app.render().path, "/output-preview");
    }

    #[tokio::test]
    async fn committed_role_is_not_silently_replaced() {
        let mut app = app();
        dispatch(&mut app, sign_in("ada@forsee.ai")).await.unwrap();
        let role = |role| Command::Role {
            role: Some(role),
            clear: false,
        };
        dispatch(&mut app, role(Role::Viewer)).await.unwrap();
        assert!(dispatch(&mut app, role(Role::Admin)).await.is_err());
        assert_eq!(app.session().role(), Some(Role::Viewer));
    }

    #[test]
    fn sensor_assignments_need_a_key() {
        assert_eq!(
            parse_assignment("oilTemp = 85"),
            Ok(("oilTemp".to_string(), "85".to_string()))
        );
        assert!(parse_assignment("=85").is_err());
        assert!(parse_assignment("oilTemp").is_err());
    }
}
