use iterdig_domain::{CliOverrides, Config};
use tracing::debug;

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides)
        .map_err(|e| anyhow::anyhow!("failed to load configuration: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    Ok(config)
}

/// Must run after the subscriber is installed.
pub fn log_config(config: &Config, path: Option<&str>) {
    debug!(
        path = ?path.map(str::to_string).or_else(Config::get_config_path),
        root_servers = config.resolver.root_servers.len(),
        dnssec = config.resolver.dnssec,
        server_selection = ?config.resolver.server_selection,
        "Configuration loaded"
    );
}
