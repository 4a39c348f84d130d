//! `lengthwise status`: Show configuration and backend reachability.

use lengthwise_client::EnhanceClient;
use lengthwise_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("📏 Lengthwise Status");
    println!("====================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.provider);
    println!("  Model:        {}", config.model);
    println!("  API key:      {}", if config.has_api_key() { "configured" } else { "missing" });
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!("  Tolerance:    +{}%", config.limits.tolerance_percent);
    println!("  Backend:      {}", config.client.backend_url);

    let client = EnhanceClient::from_config(&config.client);
    match client.health().await {
        Ok(health) => println!(
            "\n  ✅ Backend reachable (AI {})",
            if health.ai_enabled { "enabled" } else { "disabled" }
        ),
        Err(e) => println!("\n  ⚠️  Backend not reachable: {e}"),
    }

    Ok(())
}
