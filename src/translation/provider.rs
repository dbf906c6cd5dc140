//! Endpoint resolution for API-compatible providers.
//!
//! Two wire conventions are supported: the first-party ChatGLM platform
//! (also reachable through the Cloudflare AI gateway) and generic
//! OpenAI-compatible endpoints. Resolution is pure so the translate path
//! and the validation probe share it.

/// Default endpoint when no `api_url` is configured.
pub const DEFAULT_API_URL: &str = "https://open.bigmodel.cn";

/// Hosts served by the first-party platform.
const FIRST_PARTY_HOSTS: &[&str] = &["open.bigmodel.cn", "gateway.ai.cloudflare.com"];

const CHAT_COMPLETIONS_PATH: &str = "/api/paas/v4/chat/completions";
const LEGACY_PATH: &str = "/v1/chat/completions";

/// Which response/error convention an endpoint follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    /// First-party platform: errors arrive as an `error` field plus an
    /// HTTP status.
    ChatCompletions,
    /// Generic OpenAI-compatible endpoint: errors arrive as a null `data`
    /// field plus a numeric status code.
    Legacy,
}

impl SchemaKind {
    /// Classifies a first-party validation failure by HTTP status.
    ///
    /// 4xx statuses are client-parameter failures; everything else is a
    /// generic API failure.
    pub const fn is_client_error(status: u16) -> bool {
        status >= 400 && status < 500
    }

    /// Maps a legacy numeric status code to a human-readable reason.
    ///
    /// Unrecognized codes fall back to a generic invalid-parameter
    /// message.
    pub const fn legacy_reason(code: i64) -> &'static str {
        match code {
            -9999 => "API异常错误",
            -2000 => "请求参数非法",
            -2001 => "请求失败",
            -2002 => "Token已失效",
            -2003 => "远程文件URL非法",
            -2004 => "远程文件超出大小",
            -2005 => "已有对话流正在输出",
            -2006 => "内容由于合规问题已被阻止生成",
            -2007 => "图像生成失败",
            -1000 => "系统异常",
            -1001 => "请求参数校验错误",
            -1002 => "无匹配的路由",
            _ => "参数错误，请检查参数。",
        }
    }
}

/// A resolved provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    /// Normalized base URL (https scheme, no trailing slash).
    pub base_url: String,
    /// Path of the chat-completions endpoint under `base_url`.
    pub endpoint_path: &'static str,
    /// Response/error convention of this endpoint.
    pub schema: SchemaKind,
}

impl ProviderProfile {
    /// Resolves a configured base URL into a concrete endpoint profile.
    pub fn resolve(configured_url: &str) -> Self {
        let base_url = normalize_base_url(configured_url);
        let schema = if FIRST_PARTY_HOSTS.contains(&host_of(&base_url)) {
            SchemaKind::ChatCompletions
        } else {
            SchemaKind::Legacy
        };
        let endpoint_path = match schema {
            SchemaKind::ChatCompletions => CHAT_COMPLETIONS_PATH,
            SchemaKind::Legacy => LEGACY_PATH,
        };

        Self {
            base_url,
            endpoint_path,
            schema,
        }
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completion_url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint_path)
    }
}

/// Forces an `https://` scheme when none is present and strips exactly
/// one trailing slash. Idempotent.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    let with_scheme = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    with_scheme
        .strip_suffix('/')
        .map_or(with_scheme.clone(), str::to_string)
}

/// Extracts the host portion of a normalized URL.
fn host_of(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split(['/', ':'])
        .next()
        .unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_base_url("open.bigmodel.cn"), "https://open.bigmodel.cn");
    }

    #[test]
    fn test_normalize_strips_one_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://api.example.com/"),
            "https://api.example.com"
        );
    }

    #[test]
    fn test_normalize_keeps_http_scheme() {
        assert_eq!(
            normalize_base_url("http://localhost:11434"),
            "http://localhost:11434"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for url in ["open.bigmodel.cn/", "https://api.example.com", "api.example.com/v1/"] {
            let once = normalize_base_url(url);
            assert_eq!(normalize_base_url(&once), once);
        }
    }

    #[test]
    fn test_first_party_hosts_use_chat_completions_schema() {
        let profile = ProviderProfile::resolve(DEFAULT_API_URL);
        assert_eq!(profile.schema, SchemaKind::ChatCompletions);
        assert_eq!(
            profile.completion_url(),
            "https://open.bigmodel.cn/api/paas/v4/chat/completions"
        );

        let profile = ProviderProfile::resolve("gateway.ai.cloudflare.com/v1/acct/glm");
        assert_eq!(profile.schema, SchemaKind::ChatCompletions);
    }

    #[test]
    fn test_other_hosts_use_legacy_schema() {
        let profile = ProviderProfile::resolve("https://api.example.com");
        assert_eq!(profile.schema, SchemaKind::Legacy);
        assert_eq!(
            profile.completion_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let a = ProviderProfile::resolve("open.bigmodel.cn/");
        let b = ProviderProfile::resolve("open.bigmodel.cn/");
        assert_eq!(a, b);
    }

    #[test]
    fn test_legacy_reason_table() {
        assert_eq!(SchemaKind::legacy_reason(-2002), "Token已失效");
        assert_eq!(SchemaKind::legacy_reason(-1002), "无匹配的路由");
        assert_eq!(SchemaKind::legacy_reason(42), "参数错误，请检查参数。");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(SchemaKind::is_client_error(400));
        assert!(SchemaKind::is_client_error(401));
        assert!(SchemaKind::is_client_error(499));
        assert!(!SchemaKind::is_client_error(500));
        assert!(!SchemaKind::is_client_error(200));
    }
}
