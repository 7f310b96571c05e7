use ab_domain::config::{Config, ConfigSeverity};

/// Print every validation issue for `config`; `true` when none is an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        print_summary(config);
        return true;
    }

    for issue in &issues {
        println!("{issue}");
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    println!(
        "\n{errors} error(s), {} warning(s) in {config_path}",
        issues.len() - errors
    );

    errors == 0
}

fn print_summary(config: &Config) {
    println!("  listen:       {}:{}", config.server.host, config.server.port);
    println!("  secrets:      ssm ({})", config.secrets.region);
    println!("  datastore:    {}", config.datastore.base_url);
    println!("  assistant:    {}", config.assistant.base_url);
}

/// Dump the resolved config (all defaults filled in) as TOML.
pub fn show(config: &Config) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)?;
    print!("{output}");
    Ok(())
}
