use crate::cli::client::ApiClient;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;

pub async fn handle(server: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::authenticated(server)?;
    let summary = client.get("/api/dashboard/summary").await?;
    output_value(&output_format, &summary)
}
