//! `palette`: command-line front end for the palette store

mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use palette_core::PaletteService;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = CliArgs::parse();

    let store = args
        .storage_backend()
        .open()
        .await
        .with_context(|| format!("failed to open {} store", args.backend))?;
    let service = PaletteService::with_config(store, args.palette_config())?;

    let outcome = commands::run(&service, args.command).await;
    // Close even when the command failed so sled flushes
    service.close().await?;

    let output = outcome?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
