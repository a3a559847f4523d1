use agil_core::config::ResolvedConfig;

use crate::error::CliError;

pub fn run_config_show(config: &ResolvedConfig, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        for line in render_config(config) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn render_config(config: &ResolvedConfig) -> Vec<String> {
    vec![
        format!("environment: {}", config.environment),
        format!("source uri: {}", config.source_uri),
        format!("api base url: {}", config.api_base_url),
        format!("allowed hosts: {}", config.allowed_hosts.join(", ")),
        format!("identity url: {}", config.identity_url),
        format!(
            "firebase api key: {}",
            if config.firebase_api_key.is_some() {
                "set"
            } else {
                "not set"
            }
        ),
        format!(
            "notification defaults: \"{}\" / \"{}\" (initial delay {} ms)",
            config.notifications.default_title,
            config.notifications.default_body,
            config.notifications.display_delay_ms
        ),
    ]
}
