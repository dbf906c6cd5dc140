mod client;
mod error;
mod language;
mod normalize;
mod prompt;
mod provider;
mod sse;

pub use client::{TranslationClient, TranslationRequest, Translation, TranslationUpdate, UpdateStream};
pub use error::TranslateError;
pub use language::{SUPPORTED_LANGUAGES, display_name, print_languages, validate_language};
pub use normalize::normalize;
pub use prompt::{PromptOverrides, PromptPair, build_prompts};
pub use provider::{DEFAULT_API_URL, ProviderProfile, SchemaKind, normalize_base_url};
pub use sse::{FrameEvent, StreamAccumulator};
