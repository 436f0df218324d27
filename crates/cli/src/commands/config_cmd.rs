//! `quanta config` — Print settings as TOML.

use std::path::PathBuf;

use quanta_config::SynapseSettings;

pub fn run(path: Option<PathBuf>, defaults: bool) -> Result<(), Box<dyn std::error::Error>> {
    if defaults {
        print!("{}", SynapseSettings::default_toml());
        return Ok(());
    }

    let mut settings = super::load_settings(path)?;
    if !settings.connection.api_key.is_empty() {
        settings.connection.api_key = "[REDACTED]".into();
    }
    print!("{}", toml_string(&settings)?);
    Ok(())
}

fn toml_string(settings: &SynapseSettings) -> Result<String, Box<dyn std::error::Error>> {
    Ok(toml::to_string_pretty(settings)?)
}
