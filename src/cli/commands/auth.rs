use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::{self, Session};
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and cache the access token")]
    Login {
        #[arg(long, help = "Account email")]
        email: String,
        #[arg(long, env = "FINRECON_PASSWORD", hide_env_values = true, help = "Account password")]
        password: String,
    },

    #[command(about = "Forget the cached session")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Register new user")]
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value = "")]
        country: String,
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, env = "FINRECON_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, help = "Defaults to --password")]
        confirm_password: Option<String>,
    },

    #[command(about = "Request a password recovery code")]
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    #[command(about = "Check a password recovery code")]
    VerifyCode {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
}

pub async fn handle(cmd: AuthCommands, server: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let client = ApiClient::new(server)?;
            let response = client
                .post("/api/auth/login", &json!({ "email": email, "password": password }))
                .await?;

            let access_token = response
                .get("accessToken")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow::anyhow!("Login response did not include an access token"))?
                .to_string();
            let expires_in = response.get("expiresIn").and_then(Value::as_i64).unwrap_or(3600);
            let user = response.get("user").cloned().unwrap_or(Value::Null);

            let session = Session::new(server, access_token, expires_in, user.clone());
            config::save_session(&session)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", session.email()),
                Some(json!({ "user": user, "expiresAt": session.expires_at })),
            )
        }
        AuthCommands::Logout => {
            let message = if config::clear_session()? {
                "Logged out"
            } else {
                "No cached session"
            };
            output_success(&output_format, message, None)
        }
        AuthCommands::Status => match config::load_session(server)? {
            Some(session) => output_value(
                &output_format,
                &json!({
                    "server": session.server,
                    "email": session.email(),
                    "role": session.user.get("role").cloned().unwrap_or(Value::Null),
                    "expiresAt": session.expires_at,
                }),
            ),
            None => output_success(&output_format, &format!("Not logged in to {}", server), None),
        },
        AuthCommands::Register {
            email,
            first_name,
            last_name,
            country,
            gender,
            password,
            confirm_password,
        } => {
            let client = ApiClient::new(server)?;
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            let response = client
                .post(
                    "/api/auth/register",
                    &json!({
                        "email": email,
                        "firstName": first_name,
                        "lastName": last_name,
                        "country": country,
                        "gender": gender,
                        "password": password,
                        "confirmPassword": confirm_password,
                    }),
                )
                .await?;
            output_success(&output_format, message_of(&response), None)
        }
        AuthCommands::ForgotPassword { email } => {
            let client = ApiClient::new(server)?;
            let response = client
                .post("/api/auth/forgot-password", &json!({ "email": email }))
                .await?;
            output_success(&output_format, message_of(&response), None)
        }
        AuthCommands::VerifyCode { email, code } => {
            let client = ApiClient::new(server)?;
            let response = client
                .post("/api/auth/verify-code", &json!({ "email": email, "code": code }))
                .await?;
            output_success(&output_format, message_of(&response), None)
        }
    }
}

pub(crate) fn message_of(response: &Value) -> &str {
    response.get("message").and_then(Value::as_str).unwrap_or("Done")
}
