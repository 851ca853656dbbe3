use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use figlay::{ConverterConfig, FigmaFile, LayoutBuilder, ScreenPolicy};

#[derive(Parser)]
#[command(name = "figlay", version, about = "Design documents to web-oriented layout")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the layout for a design file saved on disk
    Parse {
        /// Path to the files API JSON response
        file: PathBuf,
        /// Also treat top-level INSTANCE and COMPONENT nodes as screens
        #[arg(long)]
        components: bool,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Fetch a design by URL and print its layout
    #[cfg(feature = "remote")]
    Fetch {
        url: String,
        #[arg(long)]
        components: bool,
    },
    /// Generate one page per screen and bundle them into a zip
    #[cfg(feature = "remote")]
    Convert {
        url: String,
        /// Target framework tag passed to the generator
        #[arg(long, default_value = "html")]
        framework: String,
        /// Output bundle path
        #[arg(long, default_value = "figma_site.zip")]
        out: PathBuf,
        #[arg(long)]
        components: bool,
    },
}

fn policy(components: bool) -> ScreenPolicy {
    if components {
        ScreenPolicy::FramesAndComponents
    } else {
        ScreenPolicy::FramesOnly
    }
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let out = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            file,
            components,
            compact,
        } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let design = FigmaFile::from_json(&json)?;
            let layout = LayoutBuilder::with_policy(policy(components)).build(&design)?;
            print_json(&layout, compact)?;
        }
        #[cfg(feature = "remote")]
        Command::Fetch { url, components } => {
            use figlay::figma::{DocumentSource, FigmaClient};

            let config = ConverterConfig::from_env();
            let client = FigmaClient::new(&config)?;
            let document = client.fetch(&url)?;
            let design = FigmaFile::from_value(&document)?;
            let layout = LayoutBuilder::with_policy(policy(components)).build(&design)?;
            print_json(&layout, false)?;
        }
        #[cfg(feature = "remote")]
        Command::Convert {
            url,
            framework,
            out,
            components,
        } => {
            let config = ConverterConfig {
                screen_policy: policy(components),
                ..ConverterConfig::from_env()
            };
            let converter = figlay::Converter::from_config(config)?;
            let done = converter.convert(&url, &framework)?;
            done.archive
                .write_to(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            log::info!(
                "wrote {} screens to {} (cache {:?})",
                done.screens,
                out.display(),
                done.cache
            );
        }
    }
    Ok(())
}
