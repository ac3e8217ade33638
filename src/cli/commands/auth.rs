use clap::Subcommand;
use serde_json::json;

use crate::cli::config::build_client;
use crate::cli::utils::{output_error, output_record, output_success, prompt};
use crate::cli::OutputFormat;
use crate::client::ClientError;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to the API and store the session token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the signed-in user")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, url: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = build_client(url)?;

    match cmd {
        AuthCommands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password")?,
            };
            let session = client.login(&email, &password).await?;
            let user = session.user.map(|u| json!(u)).unwrap_or(json!(null));
            output_success(
                &output_format,
                &format!("Logged in as {} at {}", email, client.base_url()),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Logout => {
            client.logout().await?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => match client.me().await {
            Ok(user) => output_record(&output_format, "Current user", &json!(user)),
            Err(ClientError::SessionExpired) => {
                output_error(&output_format, "Session expired, run `javelin auth login`", Some("SESSION_EXPIRED"))
            }
            Err(ClientError::Api { status: 401, .. }) => {
                output_error(&output_format, "Not logged in", Some("UNAUTHORIZED"))
            }
            Err(e) => Err(e.into()),
        },
    }
}
