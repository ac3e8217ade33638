use crate::cli::config::build_client;
use crate::cli::utils::{output_error, output_record};
use crate::cli::OutputFormat;

pub async fn handle(url: Option<&str>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = build_client(url)?;
    match client.health().await {
        Ok(status) => output_record(&output_format, &format!("{} is up", client.base_url()), &status),
        Err(e) => output_error(&output_format, &e.to_string(), Some("UNHEALTHY")),
    }
}
