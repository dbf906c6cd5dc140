//! # glmt - Streaming Translation CLI
//!
//! `glmt` translates text through ChatGLM and other OpenAI-compatible
//! chat-completion endpoints. It builds language-pair-aware prompts
//! (including a same-language "polish" mode), streams partial
//! translations as they arrive, and normalizes quoting artifacts out of
//! the final result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a file to Japanese
//! glmt --from en --to ja ./notes.md
//!
//! # Translate from stdin
//! cat report.md | glmt --from en --to zh-Hans
//!
//! # Check the configured key and endpoint
//! glmt validate
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/glmt/config.toml`:
//!
//! ```toml
//! api_keys = "your-key"
//! api_url = "https://open.bigmodel.cn"
//! model = "glm-4"
//! stream = true
//! from = "en"
//! to = "zh-Hans"
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet mode, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Translation engine: prompts, provider resolution, streaming, and the
/// HTTP client.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
