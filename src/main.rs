use anyhow::Result;
use clap::Parser;

use glmt_cli::cli::commands::{translate, validate};
use glmt_cli::cli::{Args, Command};
use glmt_cli::output::{self, OutputConfig};
use glmt_cli::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig { quiet: args.quiet });

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Validate) => {
            let options = validate::ValidateOptions {
                url: args.url,
                api_key: args.api_key,
            };
            validate::run_validate(options).await?;
        }
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                from: args.from,
                to: args.to,
                url: args.url,
                model: args.model,
                api_key: args.api_key,
                no_stream: args.no_stream,
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}
