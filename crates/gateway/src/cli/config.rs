use sm_domain::config::{Config, ConfigSeverity};

/// Parse and validate the config, printing every issue found.
///
/// Returns `true` when the config has no errors (warnings are allowed).
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let mut errors = 0;
    let mut warnings = 0;
    for issue in &issues {
        println!("{issue}");
        match issue.severity {
            ConfigSeverity::Error => errors += 1,
            ConfigSeverity::Warning => warnings += 1,
        }
    }
    println!("\n{errors} error(s), {warnings} warning(s) in {config_path}");

    errors == 0
}

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("Failed to serialize config: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        assert!(validate(&Config::default(), "config.toml"));
    }

    #[test]
    fn broken_config_fails_validation() {
        let mut config = Config::default();
        config.llm.model = String::new();
        assert!(!validate(&config, "config.toml"));
    }
}
