use anyhow::{Result, bail};
use futures_util::StreamExt;
use std::io::{self, Write};

use super::report;
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::input::InputReader;
use crate::translation::{
    PromptOverrides, TranslationClient, TranslationRequest, TranslationUpdate, validate_language,
};
use crate::ui::{Spinner, Style};
use crate::warn;

pub struct TranslateOptions {
    pub file: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub no_stream: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let config_file = ConfigManager::new().load_or_default();
    let resolved = resolve_config(
        &ResolveOptions {
            from: options.from,
            to: options.to,
            url: options.url,
            model: options.model,
            api_key: options.api_key,
            no_stream: options.no_stream,
        },
        &config_file,
    )?;

    validate_language(&resolved.to).map_err(report)?;

    let text = InputReader::read(options.file.as_deref())?;
    if text.trim().is_empty() {
        bail!("Error: Input is empty");
    }

    let client = TranslationClient::new(&resolved.api_url, resolved.api_key.clone());
    let request = TranslationRequest {
        from: resolved.from,
        to: resolved.to,
        text,
        model: resolved.model,
        prompts: PromptOverrides {
            system_template: resolved.custom_system_prompt,
            user_template: resolved.custom_user_prompt,
        },
    };

    if resolved.stream {
        stream_translation(&client, &request).await
    } else {
        blocking_translation(&client, &request).await
    }
}

async fn stream_translation(client: &TranslationClient, request: &TranslationRequest) -> Result<()> {
    let spinner = Spinner::new("Translating...");

    let mut updates = match client.translate_stream(request).await {
        Ok(updates) => updates,
        Err(err) => {
            spinner.stop();
            return Err(report(err));
        }
    };

    // Partials carry the full accumulated text; only the unseen suffix is
    // printed.
    let mut printed = 0usize;
    let mut waiting = true;

    while let Some(update) = updates.next().await {
        match update {
            Ok(TranslationUpdate::Partial(text)) => {
                if waiting {
                    spinner.stop();
                    waiting = false;
                }
                print!("{}", &text[printed..]);
                io::stdout().flush()?;
                printed = text.len();
            }
            Ok(TranslationUpdate::Finished(translation)) => {
                if waiting {
                    spinner.stop();
                }
                if printed == 0 {
                    println!("{}", translation.paragraphs.join("\n"));
                } else {
                    println!();
                }
                return Ok(());
            }
            Err(err) if err.is_recoverable() => {
                warn!("{} {err}", Style::warning("Warning:"));
            }
            Err(err) => {
                spinner.stop();
                return Err(report(err));
            }
        }
    }

    Ok(())
}

async fn blocking_translation(
    client: &TranslationClient,
    request: &TranslationRequest,
) -> Result<()> {
    let spinner = Spinner::new("Translating...");
    let result = client.translate(request).await;
    spinner.stop();

    let translation = result.map_err(report)?;
    println!("{}", translation.paragraphs.join("\n"));
    Ok(())
}
