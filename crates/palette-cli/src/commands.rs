//! Subcommand execution

use anyhow::{Context, Result};
use palette_core::{ColorEntry, PaletteService};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::{ColorCommand, Command, ModeCommand};

fn parse_colors(raw: &str) -> Result<Vec<ColorEntry>> {
    serde_json::from_str(raw).context("colors must be a JSON array of color entries")
}

fn to_value(value: impl Serialize) -> Result<Value> {
    serde_json::to_value(value).context("failed to encode output")
}

/// Run one subcommand, returning the JSON to print
pub async fn run(service: &PaletteService, command: Command) -> Result<Value> {
    let output = match command {
        Command::Init => to_value(service.initialize().await?)?,
        Command::Show => to_value(service.read_configuration().await?)?,
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read {file}"))?;
            let document: Value =
                serde_json::from_str(&raw).with_context(|| format!("{file} is not valid JSON"))?;
            service.replace_configuration(document).await?;
            json!({ "success": true })
        }
        Command::Wipe => {
            service.delete_configuration().await?;
            json!({ "success": true })
        }
        Command::Modes => to_value(service.list_modes().await?)?,
        Command::Mode(command) => run_mode(service, command).await?,
        Command::Color(command) => run_color(service, command).await?,
    };
    Ok(output)
}

async fn run_mode(service: &PaletteService, command: ModeCommand) -> Result<Value> {
    let output = match command {
        ModeCommand::Get { name } => to_value(service.get_mode(&name).await?)?,
        ModeCommand::Create { name, colors } => {
            let initial = match colors {
                Some(raw) => parse_colors(&raw)?,
                None => Vec::new(),
            };
            let mode_name = service.create_mode(&name, initial).await?;
            json!({ "modeName": mode_name, "originalName": name })
        }
        ModeCommand::Rename { old, new } => {
            let mode_name = service.rename_mode(&old, &new).await?;
            json!({ "oldName": old, "newName": mode_name })
        }
        ModeCommand::Delete { name } => {
            let removed = service.delete_mode(&name).await?;
            json!({ "deleted": name, "colors": removed.colors.len() })
        }
        ModeCommand::SetColors { name, colors } => {
            to_value(service.replace_mode_colors(&name, parse_colors(&colors)?).await?)?
        }
    };
    Ok(output)
}

async fn run_color(service: &PaletteService, command: ColorCommand) -> Result<Value> {
    let output = match command {
        ColorCommand::Add { mode, fields } => {
            to_value(service.add_color(&mode, fields.into_draft()).await?)?
        }
        ColorCommand::Update { id, fields } => {
            to_value(service.update_color(&id, fields.into_draft()).await?)?
        }
        ColorCommand::Delete { id } => {
            let removed = service.delete_color(&id).await?;
            json!({ "deleted": removed.id })
        }
    };
    Ok(output)
}
