//! Prompt construction for translation and polish requests.

use super::language::display_name;

/// Default system prompt for translation requests.
pub const SYSTEM_PROMPT: &str =
    "You are a translation engine that can only translate text and cannot interpret it.";

/// System prompt used when source and target language are the same.
pub const EMBELLISH_SYSTEM_PROMPT: &str =
    "You are a text embellisher, you can only embellish the text, don't interpret it.";

/// A system/user prompt pair ready to be sent as chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Caller-supplied prompt templates.
///
/// Non-empty templates replace the generated prompts entirely, after
/// `{from}`, `{to}` and `{text}` placeholder substitution.
#[derive(Debug, Clone, Default)]
pub struct PromptOverrides {
    pub system_template: Option<String>,
    pub user_template: Option<String>,
}

/// Builds the system and user prompts for one request.
///
/// Instruction selection, in precedence order:
/// 1. same source and target: polish mode (embellisher system prompt,
///    `润色此句` for Chinese targets, `polish this sentence` otherwise);
/// 2. source is a Chinese variant (`wyw`, `zh-Hans`, `zh-Hant`) and the
///    target is `zh-Hant`, `zh-Hans` or `yue`: fixed 白话文 instruction;
/// 3. target is `wyw` or `yue`: `翻译成{target}` regardless of source;
/// 4. otherwise the generic `translate from {from} to {to}`.
///
/// The source text is always appended after the instruction, separated by
/// a blank line.
pub fn build_prompts(from: &str, to: &str, text: &str, overrides: &PromptOverrides) -> PromptPair {
    let source_name = display_name(from).unwrap_or(from);
    let target_name = display_name(to).unwrap_or(to);

    let mut system = SYSTEM_PROMPT.to_string();
    let mut instruction = format!("translate from {source_name} to {target_name}");

    if to == "wyw" || to == "yue" {
        instruction = format!("翻译成{target_name}");
    }

    if matches!(from, "wyw" | "zh-Hans" | "zh-Hant") {
        match to {
            "zh-Hant" => instruction = "翻译成繁体白话文".to_string(),
            "zh-Hans" => instruction = "翻译成简体白话文".to_string(),
            "yue" => instruction = "翻译成粤语白话文".to_string(),
            _ => {}
        }
    }

    if from == to {
        system = EMBELLISH_SYSTEM_PROMPT.to_string();
        instruction = if to == "zh-Hant" || to == "zh-Hans" {
            "润色此句".to_string()
        } else {
            "polish this sentence".to_string()
        };
    }

    let user = format!("{instruction}:\n\n{text}");

    PromptPair {
        system: apply_template(overrides.system_template.as_deref(), from, to, text)
            .unwrap_or(system),
        user: apply_template(overrides.user_template.as_deref(), from, to, text).unwrap_or(user),
    }
}

/// Substitutes `{from}`, `{to}` and `{text}` in a custom template.
///
/// Returns `None` for absent or empty templates so the generated prompt
/// is used instead.
fn apply_template(template: Option<&str>, from: &str, to: &str, text: &str) -> Option<String> {
    let template = template?.trim();
    if template.is_empty() {
        return None;
    }

    Some(
        template
            .replace("{from}", display_name(from).unwrap_or(from))
            .replace("{to}", display_name(to).unwrap_or(to))
            .replace("{text}", text),
    )
}
