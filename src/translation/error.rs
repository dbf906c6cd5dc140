//! Error taxonomy for the translation engine.
//!
//! Every failure the engine can produce is one of these variants, so
//! callers have a single channel to inspect whether an error came from
//! configuration, the credential, the transport, or the upstream payload.

use thiserror::Error;

/// Link shown when the provider rejects the configured API key.
pub const TOKEN_TROUBLESHOOTING_LINK: &str =
    "https://zhipu-ai.feishu.cn/wiki/VdWrwLQLSicQxekqlvJcVhPQnze";

/// Link shown on validation failures against the first-party platform.
pub const PROVIDER_FAQ_LINK: &str = "https://open.bigmodel.cn/dev/howuse/faq";

/// Errors produced by the translation engine.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The target language code is not in the supported table.
    #[error("unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    /// A required configuration value is absent (e.g. custom model name).
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// No API key was configured.
    #[error("missing API key: set 'api_keys' in the config file or pass --api-key")]
    MissingCredential,

    /// The provider rejected the configured API key.
    #[error("invalid API key: {message}")]
    InvalidCredential {
        message: String,
        troubleshooting: &'static str,
    },

    /// The provider rejected the request parameters (4xx-class failure).
    #[error("invalid request parameters: {message}")]
    InvalidParameter {
        message: String,
        troubleshooting: &'static str,
    },

    /// A single stream frame failed to decode. Non-fatal: the stream
    /// continues with subsequent frames.
    #[error("malformed stream frame: {detail}")]
    MalformedPayload { detail: String, raw: String },

    /// The transport succeeded but the payload was unusable.
    #[error("API error: {message}")]
    UpstreamApi {
        message: String,
        detail: Option<String>,
    },

    /// Network-level failure surfaced by the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl TranslateError {
    /// Returns `true` for errors that do not abort an in-flight stream.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. })
    }

    /// Returns the remediation link attached to this error, if any.
    pub const fn troubleshooting_link(&self) -> Option<&'static str> {
        match self {
            Self::InvalidCredential { troubleshooting, .. }
            | Self::InvalidParameter { troubleshooting, .. } => Some(*troubleshooting),
            _ => None,
        }
    }
}
