//! `ruchulu status`: Show configuration and provider status.

use ruchulu_config::AppConfig;
use ruchulu_providers::select_path;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🌶️  Ruchulu Status");
    println!("=================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Mode:         {}", config.genie.mode);
    println!("  Provider:     {}", select_path(&config));
    println!("  Primary:      {}", configured(config.primary.is_configured()));
    println!(
        "  Secondary:    {} ({} @ {})",
        configured(config.secondary.is_configured()),
        config.secondary.model(),
        config.secondary.base_url()
    );
    println!("  On failure:   {:?}", config.genie.secondary_failure_policy());
    println!("  Timeout:      {}s", config.genie.request_timeout_secs);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "  Store seed:   {}",
        config.store.seed_file.as_deref().unwrap_or("none")
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, run `ruchulu init` first");
    }

    Ok(())
}

fn configured(yes: bool) -> &'static str {
    if yes { "configured" } else { "not configured" }
}
