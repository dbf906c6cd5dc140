use anyhow::Result;

use super::report;
use crate::config::{ConfigManager, split_api_keys};
use crate::status;
use crate::translation::{DEFAULT_API_URL, TranslateError, TranslationClient};
use crate::ui::Style;

pub struct ValidateOptions {
    pub url: Option<String>,
    pub api_key: Option<String>,
}

/// Sends a minimal test request through the resolved endpoint to verify
/// that the configured key and URL work.
pub async fn run_validate(options: ValidateOptions) -> Result<()> {
    let config_file = ConfigManager::new().load_or_default();

    let api_key = options
        .api_key
        .or_else(|| {
            config_file
                .api_keys
                .as_deref()
                .map(split_api_keys)
                .and_then(|keys| keys.into_iter().next())
        })
        .ok_or_else(|| report(TranslateError::MissingCredential))?;

    let url = options
        .url
        .or(config_file.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let client = TranslationClient::new(&url, api_key);
    status!(
        "Validating {}",
        Style::secondary(client.profile().completion_url())
    );

    client.validate().await.map_err(report)?;
    println!("{}", Style::success("Connection OK"));
    Ok(())
}
