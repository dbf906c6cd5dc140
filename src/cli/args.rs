use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "glmt")]
#[command(about = "Streaming translation CLI for ChatGLM and OpenAI-compatible endpoints")]
#[command(version)]
pub struct Args {
    /// File to translate (reads from stdin if not provided)
    pub file: Option<String>,

    /// Source language code (e.g., en, ja, zh-Hans)
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Target language code (e.g., en, ja, zh-Hans)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Base API URL (defaults to the ChatGLM platform)
    #[arg(short = 'u', long = "url", global = true)]
    pub url: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API key (overrides the config file)
    #[arg(short = 'k', long = "api-key", global = true)]
    pub api_key: Option<String>,

    /// Disable streaming output
    #[arg(long)]
    pub no_stream: bool,

    /// Suppress status output on stderr
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported language codes
    Languages,
    /// Verify that the configured API key and endpoint work
    Validate,
}
