//! `lengthwise doctor`: Diagnose setup problems.

use std::time::Duration;

use lengthwise_client::EnhanceClient;
use lengthwise_config::AppConfig;
use lengthwise_core::Provider;
use lengthwise_providers::router::build_with_timeout;

/// Result of probing the model provider directly.
#[derive(Debug, PartialEq, Eq)]
pub enum ProviderCheck {
    NoKey,
    Ready,
    /// Reachable, but the credential was refused.
    Refused,
    Unreachable(String),
}

/// Probe the configured provider's `/models` endpoint with the client's
/// health timeout.
pub async fn check_provider(config: &AppConfig) -> ProviderCheck {
    let timeout = Duration::from_secs(config.client.health_timeout_secs);
    let Some(provider) = build_with_timeout(config, timeout) else {
        return ProviderCheck::NoKey;
    };
    match provider.health_check().await {
        Ok(true) => ProviderCheck::Ready,
        Ok(false) => ProviderCheck::Refused,
        Err(e) => ProviderCheck::Unreachable(e.to_string()),
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Lengthwise Doctor");
    println!("====================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `lengthwise onboard` to create one)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    match check_provider(&config).await {
        ProviderCheck::Ready => println!("  ✅ Provider `{}` accepts the API key", config.provider),
        ProviderCheck::NoKey => {
            println!("  ⚠️  No API key: set OPENAI_API_KEY or api_key in config.toml");
            issues += 1;
        }
        ProviderCheck::Refused => {
            println!("  ❌ Provider `{}` refused the API key", config.provider);
            issues += 1;
        }
        ProviderCheck::Unreachable(e) => {
            println!("  ❌ Provider `{}` unreachable: {e}", config.provider);
            issues += 1;
        }
    }

    let client = EnhanceClient::from_config(&config.client);
    match client.health().await {
        Ok(health) if health.ai_enabled => println!("  ✅ Backend at {} is ready", client.base_url()),
        Ok(_) => {
            println!("  ⚠️  Backend at {} has AI disabled", client.base_url());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
