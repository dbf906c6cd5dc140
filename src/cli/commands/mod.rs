//! Subcommand implementations.

/// Translation command handler.
pub mod translate;

/// Credential/endpoint validation handler.
pub mod validate;

use crate::translation::TranslateError;

/// Converts an engine error into an anyhow error, appending the
/// remediation link when one is attached.
pub(crate) fn report(err: TranslateError) -> anyhow::Error {
    match err.troubleshooting_link() {
        Some(link) => anyhow::anyhow!("{err}\n\nSee: {link}"),
        None => anyhow::Error::new(err),
    }
}
