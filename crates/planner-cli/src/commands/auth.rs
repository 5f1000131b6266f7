use clap::Subcommand;
use planner_core::auth::{AuthSession, OAuthConfig};

use super::common::{open_planner, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in with Google in the browser
    Login {
        /// OAuth client ID (stored in the OS keyring)
        #[arg(long)]
        client_id: Option<String>,
        /// OAuth client secret (stored in the OS keyring)
        #[arg(long)]
        client_secret: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show who is signed in
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    match action {
        AuthAction::Login {
            client_id,
            client_secret,
        } => {
            match (client_id, client_secret) {
                (Some(id), Some(secret)) => OAuthConfig::store_client_credentials(&id, &secret)?,
                (None, None) => {}
                _ => return Err("--client-id and --client-secret go together".into()),
            }
            let mut planner = open_planner()?;
            let oauth = OAuthConfig::from_config(&planner.config.auth)?;
            let user = planner
                .auth
                .sign_in(&oauth, &mut planner.store)
                .map_err(|e| format!("Sign in failed: {e}"))?;
            println!("Signed in as {}", user.label());
            if planner.bridge.is_none() {
                println!("cloud sync is off; set sync.enabled and sync.endpoint to sync this planner");
            }
        }
        AuthAction::Logout => {
            let mut planner = open_planner()?;
            planner.auth.sign_out(&mut planner.store)?;
            println!("Signed out");
        }
        AuthAction::Status => match AuthSession::load() {
            Some(session) => println!("signed in as {}", session.user.label()),
            None => println!("not signed in"),
        },
    }
    Ok(())
}
