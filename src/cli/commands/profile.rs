use clap::Subcommand;
use serde_json::{json, Map, Value};

use super::auth::message_of;
use crate::cli::client::ApiClient;
use crate::cli::config;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProfileCommands {
    #[command(about = "Show your profile")]
    Show,

    #[command(about = "Update your name and/or phone number")]
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    #[command(about = "Change your password")]
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },

    #[command(about = "Delete your account")]
    Delete {
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}

pub async fn handle(cmd: ProfileCommands, server: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::authenticated(server)?;

    match cmd {
        ProfileCommands::Show => {
            let profile = client.get("/api/profile/me").await?;
            output_value(&output_format, &profile)
        }
        ProfileCommands::Update { full_name, phone } => {
            if full_name.is_none() && phone.is_none() {
                anyhow::bail!("Nothing to update: pass --full-name and/or --phone");
            }
            // Absent fields stay absent; a present phoneNumber means "set it".
            let mut body = Map::new();
            if let Some(name) = full_name {
                body.insert("fullName".to_string(), Value::String(name));
            }
            if let Some(phone) = phone {
                body.insert("phoneNumber".to_string(), Value::String(phone));
            }
            let profile = client.put("/api/profile/me", &Value::Object(body)).await?;
            output_value(&output_format, &profile)
        }
        ProfileCommands::ChangePassword { current, new } => {
            let response = client
                .post(
                    "/api/profile/me/change-password",
                    &json!({ "currentPassword": current, "newPassword": new }),
                )
                .await?;
            output_success(&output_format, message_of(&response), None)
        }
        ProfileCommands::Delete { yes } => {
            if !yes {
                anyhow::bail!("Refusing to delete without --yes");
            }
            let response = client.delete("/api/profile/me").await?;
            config::clear_session()?;
            output_success(&output_format, message_of(&response), None)
        }
    }
}
