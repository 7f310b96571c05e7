//! AppState construction for `serve`.

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use ab_domain::config::{Config, ConfigSeverity};

use crate::backends::HttpBackends;
use crate::state::AppState;

/// Log every config issue and fail when any of them is an error.
pub fn check_config(config: &Config) -> anyhow::Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if errors > 0 {
        anyhow::bail!("config validation failed with {errors} error(s)");
    }
    Ok(())
}

/// Validate config and wire the production secret store and HTTP backends.
pub async fn build_app_state(
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> anyhow::Result<AppState> {
    check_config(&config)?;

    // ── Secret store ─────────────────────────────────────────────────
    let secrets = ab_secrets::create_store(&config.secrets).await;
    tracing::info!(backend = secrets.backend(), "secret store ready");

    // ── HTTP backends ────────────────────────────────────────────────
    let backends = Arc::new(
        HttpBackends::new(&config.datastore, &config.assistant)
            .context("building HTTP clients")?,
    );
    tracing::info!(
        datastore = %config.datastore.base_url,
        assistant = %config.assistant.base_url,
        "backends ready"
    );

    Ok(AppState {
        config,
        secrets,
        backends,
        shutdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        assert!(check_config(&Config::default()).is_ok());
    }

    #[test]
    fn config_errors_abort_startup() {
        let mut config = Config::default();
        config.assistant.poll_interval_ms = 0;
        config.datastore.transcripts_table.clear();
        let err = check_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "config validation failed with 2 error(s)");
    }

    #[tokio::test]
    async fn default_config_builds_ssm_backed_state() {
        let state = build_app_state(Arc::new(Config::default()), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(state.secrets.backend(), "ssm");
        assert!(!state.shutdown.is_cancelled());
    }
}
