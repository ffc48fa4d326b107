//! `ruchulu ask`: Run one Genie request in-process.

use ruchulu_config::{AppConfig, DeploymentMode};
use ruchulu_core::menu::MenuItem;
use ruchulu_core::message::ConversationMessage;
use ruchulu_genie::{GeniePipeline, GenieRequest};
use std::path::Path;

pub async fn run(
    message: String,
    menu: Option<String>,
    mode: Option<DeploymentMode>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(mode) = mode {
        config.genie.mode = mode;
    }

    let dishes = match menu.as_deref() {
        Some(arg) => parse_menu(arg)?,
        None => Vec::new(),
    };

    let pipeline = GeniePipeline::from_config(&config)?;
    let request = GenieRequest::new(vec![ConversationMessage::user(message)]).with_dishes(dishes);
    let reply = pipeline.respond(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("🧞 {}", reply.reply_text);
        println!("   [{} · {}]", reply.mood, reply.source);
    }

    Ok(())
}

/// Accept either an inline JSON array or a path to a file holding one.
fn parse_menu(arg: &str) -> Result<Vec<MenuItem>, Box<dyn std::error::Error>> {
    let trimmed = arg.trim_start();
    let content = if trimmed.starts_with('[') {
        arg.to_string()
    } else {
        std::fs::read_to_string(Path::new(arg))
            .map_err(|e| format!("Failed to read menu file {arg}: {e}"))?
    };
    Ok(serde_json::from_str(&content)?)
}
