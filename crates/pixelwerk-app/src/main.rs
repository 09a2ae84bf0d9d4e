// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixelwerk — image enhancement and image-to-PDF assembly
//
// Entry point. Initialises logging, loads the config, and dispatches to the
// requested subcommand.

mod commands;
mod services;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pixelwerk_core::PixelwerkError;
use pixelwerk_core::human_errors::humanize_error;
use tracing_subscriber::EnvFilter;

use commands::enhance::EnhanceCommand;
use commands::pdf::PdfCommand;

#[derive(Debug, Parser)]
#[command(name = "pixelwerk", version, about = "Enhance images and assemble them into PDFs")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upscale an image 2x with edge-preserving bilinear interpolation
    Enhance(EnhanceCommand),
    /// Combine images into a single PDF
    Pdf(PdfCommand),
    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Pixelwerk starting");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, config_path) = services::settings::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Enhance(cmd) => cmd.execute(&config.enhance),
        Command::Pdf(cmd) => cmd.execute(&config.pdf).await,
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                services::settings::persist_config(&config_path, &config)?;
            }
            Ok(())
        }
    }
}

/// Print a failure, preferring the user-facing wording for library errors.
fn report(err: &anyhow::Error) {
    match err.chain().find_map(|e| e.downcast_ref::<PixelwerkError>()) {
        Some(inner) => {
            let human = humanize_error(inner);
            eprintln!("error: {}", human.message);
            eprintln!("hint: {}", human.suggestion);
            tracing::debug!(error = ?err, "Command failed");
        }
        None => eprintln!("error: {err:#}"),
    }
}
