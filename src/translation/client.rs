//! HTTP client for chat-completion translation endpoints.

use futures_util::Stream;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::pin::Pin;

use super::error::{PROVIDER_FAQ_LINK, TOKEN_TROUBLESHOOTING_LINK, TranslateError};
use super::normalize::normalize;
use super::prompt::{PromptOverrides, build_prompts};
use super::provider::{ProviderProfile, SchemaKind};
use super::sse::{FrameEvent, StreamAccumulator};

/// Model used by the validation probe.
const VALIDATION_MODEL: &str = "glm-4";

/// One translation request.
///
/// Owned exclusively by the call that created it; nothing is shared
/// between concurrent requests.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Detected source language code.
    pub from: String,
    /// Target language code.
    pub to: String,
    /// Text to translate.
    pub text: String,
    /// Model name sent to the provider.
    pub model: String,
    /// Optional custom prompt templates.
    pub prompts: PromptOverrides,
}

/// A finished translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub from: String,
    pub to: String,
    /// Normalized output, one entry per line of the model's answer.
    pub paragraphs: Vec<String>,
}

/// One update from a streaming translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationUpdate {
    /// The full text accumulated so far.
    Partial(String),
    /// The stream finished; carries the normalized result.
    Finished(Translation),
}

/// Items yielded by [`TranslationClient::translate_stream`].
///
/// `Err(e)` items with `e.is_recoverable()` report a skipped frame and
/// the stream continues; any other error terminates the stream.
pub type UpdateStream = Pin<Box<dyn Stream<Item = Result<TranslationUpdate, TranslateError>> + Send>>;

// Cow avoids cloning prompt strings that are only borrowed for
// serialization.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Client bound to one resolved endpoint and one API key.
pub struct TranslationClient {
    client: Client,
    profile: ProviderProfile,
    api_key: String,
}

impl TranslationClient {
    /// Creates a client for the given base URL, resolving the endpoint
    /// path and schema kind from the URL's host.
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: Client::new(),
            profile: ProviderProfile::resolve(base_url),
            api_key,
        }
    }

    /// The resolved endpoint profile this client talks to.
    pub const fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    /// Translates in one blocking round-trip.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<Translation, TranslateError> {
        let response = self.post_completion(request, false).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), body));
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body).unwrap_or(ChatResponse { choices: vec![] });

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(TranslateError::UpstreamApi {
                message: "the API returned no choices".to_string(),
                detail: Some(body),
            });
        };

        Ok(Translation {
            from: request.from.clone(),
            to: request.to.clone(),
            paragraphs: normalize(&choice.message.content),
        })
    }

    /// Translates in streaming mode.
    ///
    /// Yields [`TranslationUpdate::Partial`] items carrying the full
    /// accumulated text as frames arrive, then exactly one
    /// [`TranslationUpdate::Finished`]. Dropping the stream cancels the
    /// request; nothing is emitted after a drop.
    pub async fn translate_stream(
        &self,
        request: &TranslationRequest,
    ) -> Result<UpdateStream, TranslateError> {
        let response = self.post_completion(request, true).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_http_failure(status.as_u16(), body));
        }

        let from = request.from.clone();
        let to = request.to.clone();
        let mut byte_stream = response.bytes_stream();

        let updates = async_stream::stream! {
            use futures_util::StreamExt;

            let mut acc = StreamAccumulator::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(TranslateError::Transport(e));
                        return;
                    }
                };

                for event in acc.push_chunk(&String::from_utf8_lossy(&chunk)) {
                    match event {
                        FrameEvent::Delta(text) => {
                            yield Ok(TranslationUpdate::Partial(text));
                        }
                        FrameEvent::Done => {
                            yield Ok(finish(&from, &to, acc.text()));
                            return;
                        }
                        FrameEvent::Malformed { detail, raw } => {
                            yield Err(TranslateError::MalformedPayload { detail, raw });
                        }
                        FrameEvent::InvalidToken => {
                            yield Err(invalid_credential());
                            return;
                        }
                    }
                }
            }

            // Transport closed without a [DONE] frame; complete with
            // whatever accumulated.
            yield Ok(finish(&from, &to, acc.text()));
        };

        Ok(Box::pin(updates))
    }

    /// Verifies that the configured endpoint and key work, without
    /// performing a real translation.
    ///
    /// Sends a fixed non-streaming test request and interprets the
    /// response according to the endpoint's schema kind.
    pub async fn validate(&self) -> Result<(), TranslateError> {
        let body = ChatCompletionRequest {
            model: VALIDATION_MODEL,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Borrowed("You are a helpful assistant."),
                },
                Message {
                    role: "user",
                    content: Cow::Borrowed("Test connection."),
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(self.profile.completion_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let payload: serde_json::Value = response.json().await?;

        match self.profile.schema {
            SchemaKind::ChatCompletions => classify_chat_validation(status, &payload),
            SchemaKind::Legacy => classify_legacy_validation(status, &payload),
        }
    }

    async fn post_completion(
        &self,
        request: &TranslationRequest,
        stream: bool,
    ) -> Result<reqwest::Response, TranslateError> {
        let prompts = build_prompts(&request.from, &request.to, &request.text, &request.prompts);

        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![
                Message {
                    role: "system",
                    content: Cow::Owned(prompts.system),
                },
                Message {
                    role: "user",
                    content: Cow::Owned(prompts.user),
                },
            ],
            stream,
        };

        let response = self
            .client
            .post(self.profile.completion_url())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        Ok(response)
    }
}

fn finish(from: &str, to: &str, accumulated: &str) -> TranslationUpdate {
    TranslationUpdate::Finished(Translation {
        from: from.to_string(),
        to: to.to_string(),
        paragraphs: normalize(accumulated),
    })
}

fn invalid_credential() -> TranslateError {
    TranslateError::InvalidCredential {
        message: "the provider rejected the configured API key".to_string(),
        troubleshooting: TOKEN_TROUBLESHOOTING_LINK,
    }
}

/// Maps a failed HTTP status on the translate path to an error.
fn classify_http_failure(status: u16, body: String) -> TranslateError {
    if status == 401 || status == 403 {
        return TranslateError::InvalidCredential {
            message: format!("the provider returned HTTP {status}"),
            troubleshooting: TOKEN_TROUBLESHOOTING_LINK,
        };
    }

    TranslateError::UpstreamApi {
        message: format!("the API request failed with HTTP {status}"),
        detail: Some(body),
    }
}

/// First-party schema: HTTP >= 400 or an `error` field is a failure;
/// at least one choice is success.
fn classify_chat_validation(status: u16, payload: &serde_json::Value) -> Result<(), TranslateError> {
    let error_field = payload.get("error").filter(|e| !e.is_null());

    if status >= 400 || error_field.is_some() {
        let message = error_field
            .map_or_else(|| format!("HTTP {status}"), value_to_message);
        return Err(if SchemaKind::is_client_error(status) {
            TranslateError::InvalidParameter {
                message,
                troubleshooting: PROVIDER_FAQ_LINK,
            }
        } else {
            TranslateError::UpstreamApi {
                message,
                detail: None,
            }
        });
    }

    let has_choices = payload
        .get("choices")
        .and_then(serde_json::Value::as_array)
        .is_some_and(|choices| !choices.is_empty());

    if has_choices {
        Ok(())
    } else {
        Err(TranslateError::UpstreamApi {
            message: "the API returned no choices".to_string(),
            detail: Some(payload.to_string()),
        })
    }
}

/// Legacy schema: a null `data` field plus a numeric status code maps
/// through the known reason table; anything else is success.
fn classify_legacy_validation(status: u16, payload: &serde_json::Value) -> Result<(), TranslateError> {
    let data_is_null = payload.get("data").is_some_and(serde_json::Value::is_null);
    if !data_is_null {
        return Ok(());
    }

    let code = payload
        .get("code")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or_else(|| i64::from(status));

    Err(TranslateError::InvalidParameter {
        message: format!(
            "{} ({})",
            SchemaKind::legacy_reason(code),
            payload
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("no message")
        ),
        troubleshooting: PROVIDER_FAQ_LINK,
    })
}

fn value_to_message(value: &serde_json::Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}
