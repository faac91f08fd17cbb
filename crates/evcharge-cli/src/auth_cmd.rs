//! Auth subcommands: login, logout, status, register.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use evcharge_client::EvChargeApp;
use evcharge_core::models::RegisterRequest;

use crate::fmt::{write_operator_detail, write_user_detail};

/// Auth subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AuthAction {
    /// Log in. Without credentials, the remembered ones are used.
    Login {
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long, env = "EVCHARGE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Remember the credentials for the next login.
        #[arg(long)]
        remember: bool,
    },
    /// Forget the session and cached data. Works offline.
    Logout,
    /// Show the cached user.
    Status,
    /// Create an EV owner account.
    Register {
        #[arg(long)]
        nic: String,
        #[arg(long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "EVCHARGE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
}

/// Execute an auth subcommand.
pub async fn run(action: AuthAction, app: &EvChargeApp) -> anyhow::Result<()> {
    match action {
        AuthAction::Login {
            email,
            password,
            remember,
        } => login(app, email, password, remember).await,
        AuthAction::Logout => {
            app.logout().await?;
            writeln!(io::stdout(), "Logged out")?;
            Ok(())
        }
        AuthAction::Status => status(app).await,
        AuthAction::Register {
            nic,
            name,
            email,
            password,
            phone,
        } => {
            let request = RegisterRequest {
                nic,
                full_name: name,
                email,
                password,
                phone,
            };
            let resp = app.auth().register(&request).await?;
            writeln!(io::stdout(), "{}", resp.message)?;
            Ok(())
        }
    }
}

async fn login(
    app: &EvChargeApp,
    email: Option<String>,
    password: Option<String>,
    remember: bool,
) -> anyhow::Result<()> {
    let saved = app.session().remembered_credentials().await;
    let (email, password, remember) = match (email, password, saved) {
        (Some(e), Some(p), _) => (e, p, remember),
        (None, None, Some(saved)) => (saved.email, saved.password, true),
        (Some(e), None, Some(saved)) if saved.email == e => (e, saved.password, true),
        _ => anyhow::bail!("No saved credentials. Use --email and --password"),
    };

    let user = app.auth().login(&email, &password, remember).await?;

    let name = if user.full_name.is_empty() {
        &user.email
    } else {
        &user.full_name
    };
    writeln!(io::stdout(), "Logged in as {name} ({})", user.role)?;
    Ok(())
}

async fn status(app: &EvChargeApp) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let Some(user) = app.auth().current_user().await else {
        writeln!(out, "Not logged in")?;
        return Ok(());
    };
    write_user_detail(&mut out, &user)?;
    if let Some(operator) = app.auth().current_operator().await {
        write_operator_detail(&mut out, &operator)?;
    }
    if !app.session().is_logged_in().await {
        writeln!(out, "  Session:  expired, log in again")?;
    }
    Ok(())
}
